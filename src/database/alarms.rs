// file: src/database/alarms.rs
use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::models::PrayerName;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether the alarm for (date, prayer) already fired.
pub async fn was_fired(pool: &SqlitePool, date: NaiveDate, prayer: PrayerName) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM alarm_log WHERE date = ? AND prayer = ?")
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(prayer.as_str())
        .fetch_one(pool)
        .await?;
    let count: i64 = row.get("n");
    Ok(count > 0)
}

/// Records a fired alarm. Re-recording the same (date, prayer) is a no-op.
pub async fn mark_fired(pool: &SqlitePool, date: NaiveDate, prayer: PrayerName) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO alarm_log (date, prayer) VALUES (?, ?)")
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(prayer.as_str())
        .execute(pool)
        .await?;
    Ok(())
}
