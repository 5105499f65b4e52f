// file: src/database/timings.rs
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::models::DailyTimings;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stores (or replaces) the cached timings for their date.
pub async fn upsert(pool: &SqlitePool, timings: &DailyTimings) -> Result<()> {
    let payload = serde_json::to_string(timings).context("Failed to serialize timings")?;

    sqlx::query(
        "INSERT INTO timings (date, payload, fetched_at) VALUES (?, ?, CURRENT_TIMESTAMP) \
         ON CONFLICT(date) DO UPDATE SET payload = excluded.payload, \
         fetched_at = CURRENT_TIMESTAMP",
    )
    .bind(timings.date.format(DATE_FORMAT).to_string())
    .bind(payload)
    .execute(pool)
    .await?;

    Ok(())
}

/// The cached timings for `date` plus when they were fetched, if present.
pub async fn get(
    pool: &SqlitePool,
    date: NaiveDate,
) -> Result<Option<(DailyTimings, DateTime<Utc>)>> {
    let row = sqlx::query("SELECT payload, fetched_at FROM timings WHERE date = ?")
        .bind(date.format(DATE_FORMAT).to_string())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let payload: String = row.get("payload");
            let fetched_at: DateTime<Utc> = row.get("fetched_at");
            let timings =
                serde_json::from_str(&payload).context("Failed to deserialize cached timings")?;
            Ok(Some((timings, fetched_at)))
        }
        None => Ok(None),
    }
}

/// Drops cache rows older than `keep_days` days before `today`.
pub async fn prune(pool: &SqlitePool, today: NaiveDate, keep_days: u64) -> Result<u64> {
    let cutoff = today - chrono::Days::new(keep_days);
    let result = sqlx::query("DELETE FROM timings WHERE date < ?")
        .bind(cutoff.format(DATE_FORMAT).to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
