//! Headless prayer-times daemon.
//!
//! Reads its location from the environment, keeps a sqlite cache of daily
//! timings, prints a live countdown to the next prayer, and plays the adhan
//! at prayer times via the background monitor.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use openadhan::alarms::{monitor_prayers, MonitorEvent};
use openadhan::api::PrayerTimesClient;
use openadhan::audio::AudioManager;
use openadhan::calendar::hijri;
use openadhan::database::Database;
use openadhan::models::{DailyTimings, Settings};
use openadhan::prayer::{format_countdown, qibla_bearing, resolve};
use openadhan::utils::logging::{init_logging, log_error_with_context};
use openadhan::{AppConfig, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Set OPENADHAN_LAT and OPENADHAN_LON to your coordinates.");
            process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        log_error_with_context(&e, "main");
        process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<()> {
    info!("Starting OpenAdhan v{}", env!("CARGO_PKG_VERSION"));

    let db = Arc::new(Database::new(&config.db_path).await?);

    if let Err(e) = AudioManager::ensure_sound_directory() {
        warn!("Could not create sounds directory: {:#}", e);
    }
    let audio = match AudioManager::new() {
        Ok(audio) => Arc::new(audio),
        Err(e) => {
            warn!("Audio initialization failed ({:#}), alarms will be silent", e);
            Arc::new(AudioManager::new_dummy())
        }
    };

    let client = Arc::new(PrayerTimesClient::new(&config.api_base_url)?);

    let state = Arc::new(AppState {
        db,
        audio,
        client,
        coordinate: config.coordinate,
        shutdown: CancellationToken::new(),
    });

    let settings = state.db.get_settings().await?;
    let today = Local::now().date_naive();
    let mut timings = timings_for(&state, today, &settings).await?;
    print_day(&timings, &settings, &state);

    let (tx, mut rx) = mpsc::channel::<MonitorEvent>(32);
    let monitor = tokio::spawn(monitor_prayers(Arc::clone(&state), Some(tx)));

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut last_line = String::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down");
                break;
            }
            Some(event) = rx.recv() => match event {
                MonitorEvent::AlarmTriggered { prayer, time } => {
                    info!("It is time for {} ({})", prayer, time.format("%H:%M"));
                }
                MonitorEvent::TimingsRefreshed { date } => {
                    info!("Timings refreshed for {}", date);
                    if let Ok(Some((fresh, _))) = state.db.cached_timings(date).await {
                        timings = fresh;
                    }
                }
                MonitorEvent::Error(message) => {
                    error!("Monitor error: {}", message);
                }
            },
            _ = ticker.tick() => {
                let now = Local::now().naive_local();

                // Day rollover: swap in the new day's timings.
                if now.date() != timings.date {
                    let settings = state.db.get_settings().await?;
                    match timings_for(&state, now.date(), &settings).await {
                        Ok(fresh) => {
                            timings = fresh;
                            print_day(&timings, &settings, &state);
                        }
                        Err(e) => warn!("Could not load timings for {}: {:#}", now.date(), e),
                    }
                }

                let line = match resolve(&timings.times, now.time()) {
                    Ok(next) => {
                        let target = next.target_datetime(now.date());
                        format!("{} - {}", next, format_countdown(target, now))
                    }
                    Err(e) => format!("No upcoming prayer: {}", e),
                };
                if line != last_line {
                    println!("{}", line);
                    last_line = line;
                }
            }
        }
    }

    state.shutdown.cancel();
    if let Err(e) = monitor.await {
        warn!("Monitor task did not shut down cleanly: {}", e);
    }
    info!("Goodbye");
    Ok(())
}

/// Timings for `date`: cached when available, fetched and cached otherwise.
async fn timings_for(
    state: &AppState,
    date: NaiveDate,
    settings: &Settings,
) -> Result<DailyTimings> {
    if let Some((cached, _)) = state.db.cached_timings(date).await? {
        return Ok(cached);
    }

    let timings = state
        .client
        .fetch_timings(state.coordinate, date, settings)
        .await
        .with_context(|| format!("Failed to fetch prayer times for {}", date))?;
    state.db.cache_timings(&timings).await?;
    Ok(timings)
}

fn print_day(timings: &DailyTimings, settings: &Settings, state: &AppState) {
    println!("Prayer times for {} ({})", timings.readable, timings.timezone);

    let hijri_line = timings
        .hijri_readable
        .clone()
        .unwrap_or_else(|| hijri::from_gregorian(timings.date).to_string());
    if settings.hijri_calendar || timings.hijri_readable.is_some() {
        println!("Hijri date: {}", hijri_line);
    }

    for (prayer, time) in timings.times.entries() {
        println!("  {:<8} {}", prayer, time);
    }
    println!("Qibla bearing: {:.1}° from true north", qibla_bearing(state.coordinate));
}
