// file: src/database/settings.rs
use anyhow::Result;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> Result<crate::models::Settings> {
    let rows = sqlx::query_as::<_, crate::models::Setting>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    // Missing or unparseable values fall back to the defaults.
    let mut settings = crate::models::Settings::default();
    for row in rows {
        match row.key.as_str() {
            "azan_sound" => settings.azan_sound = row.value,
            "volume" => settings.volume = row.value.parse().unwrap_or(0.7),
            "alarm_fajr" => settings.alarm_fajr = row.value.parse().unwrap_or(true),
            "alarm_dhuhr" => settings.alarm_dhuhr = row.value.parse().unwrap_or(true),
            "alarm_asr" => settings.alarm_asr = row.value.parse().unwrap_or(true),
            "alarm_maghrib" => settings.alarm_maghrib = row.value.parse().unwrap_or(true),
            "alarm_isha" => settings.alarm_isha = row.value.parse().unwrap_or(true),
            "hijri_calendar" => settings.hijri_calendar = row.value.parse().unwrap_or(false),
            "method" => settings.method = row.value.parse().unwrap_or(2),
            "school" => settings.school = row.value.parse().unwrap_or(0),
            "adjustment" => settings.adjustment = row.value.parse().unwrap_or(0),
            "refetch_interval" => settings.refetch_interval = row.value.parse().unwrap_or(21600),
            _ => {}
        }
    }

    Ok(settings)
}

pub async fn update(pool: &SqlitePool, settings: &crate::models::Settings) -> Result<()> {
    let volume = settings.volume.to_string();
    let alarm_fajr = settings.alarm_fajr.to_string();
    let alarm_dhuhr = settings.alarm_dhuhr.to_string();
    let alarm_asr = settings.alarm_asr.to_string();
    let alarm_maghrib = settings.alarm_maghrib.to_string();
    let alarm_isha = settings.alarm_isha.to_string();
    let hijri_calendar = settings.hijri_calendar.to_string();
    let method = settings.method.to_string();
    let school = settings.school.to_string();
    let adjustment = settings.adjustment.to_string();
    let refetch_interval = settings.refetch_interval.to_string();

    let updates = vec![
        ("azan_sound", settings.azan_sound.as_str()),
        ("volume", volume.as_str()),
        ("alarm_fajr", alarm_fajr.as_str()),
        ("alarm_dhuhr", alarm_dhuhr.as_str()),
        ("alarm_asr", alarm_asr.as_str()),
        ("alarm_maghrib", alarm_maghrib.as_str()),
        ("alarm_isha", alarm_isha.as_str()),
        ("hijri_calendar", hijri_calendar.as_str()),
        ("method", method.as_str()),
        ("school", school.as_str()),
        ("adjustment", adjustment.as_str()),
        ("refetch_interval", refetch_interval.as_str()),
    ];

    for (key, value) in updates {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    }

    Ok(())
}
