// file: src/database/mod.rs

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};

// Declare submodules
pub mod alarms;
pub mod settings;
pub mod timings;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Opens (creating if necessary) the sqlite database at `path` and runs
    /// the schema. `path` may be a plain file path or a `sqlite:` URI.
    pub async fn new(path: &str) -> Result<Self> {
        let db_url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{}?mode=rwc", path)
        };

        let db_exists = Sqlite::database_exists(&db_url)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating database at {}", db_url);
            Sqlite::create_database(&db_url)
                .await
                .context("Failed to create database")?;
        }

        let pool = SqlitePool::connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool)
            .await
            .context("Failed to run database schema")?;

        info!("Database initialized successfully");

        Ok(Database { pool })
    }

    // --- Settings delegates ---

    pub async fn get_settings(&self) -> Result<crate::models::Settings> {
        settings::get(&self.pool).await
    }

    pub async fn update_settings(&self, settings: &crate::models::Settings) -> Result<()> {
        settings::update(&self.pool, settings).await
    }

    // --- Timings cache delegates ---

    pub async fn cache_timings(&self, daily: &crate::models::DailyTimings) -> Result<()> {
        timings::upsert(&self.pool, daily).await
    }

    pub async fn cached_timings(
        &self,
        date: NaiveDate,
    ) -> Result<Option<(crate::models::DailyTimings, DateTime<Utc>)>> {
        timings::get(&self.pool, date).await
    }

    pub async fn prune_timings(&self, today: NaiveDate, keep_days: u64) -> Result<u64> {
        timings::prune(&self.pool, today, keep_days).await
    }

    // --- Alarm log delegates ---

    pub async fn alarm_was_fired(
        &self,
        date: NaiveDate,
        prayer: crate::models::PrayerName,
    ) -> Result<bool> {
        alarms::was_fired(&self.pool, date, prayer).await
    }

    pub async fn mark_alarm_fired(
        &self,
        date: NaiveDate,
        prayer: crate::models::PrayerName,
    ) -> Result<()> {
        alarms::mark_fired(&self.pool, date, prayer).await
    }
}

async fn run_schema(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();
    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            sqlx::query(&current_statement).execute(pool).await?;
            current_statement.clear();
        }
    }
    Ok(())
}
