//! Background prayer alarm monitor.
//!
//! Wakes every 30 seconds, makes sure today's timings are on hand (cache
//! first, network on rollover or staleness), and fires the adhan for any
//! enabled prayer whose time has just passed. A fired alarm is recorded in
//! the database so restarts within the grace window do not replay it.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::Sender;

use crate::audio::AzanSound;
use crate::models::{DailyTimings, PrayerName, Settings};
use crate::utils::logging::log_alarm_fired;
use crate::AppState;

const CHECK_INTERVAL: Duration = Duration::from_secs(30);
// Alarms fire up to this long after the scheduled minute; past that the
// moment is considered missed.
const GRACE_WINDOW_SECS: i64 = 5 * 60;
const CACHE_KEEP_DAYS: u64 = 30;

#[derive(Debug, Clone)]
pub enum MonitorEvent {
    AlarmTriggered { prayer: PrayerName, time: NaiveTime },
    TimingsRefreshed { date: NaiveDate },
    Error(String),
}

/// Runs until the state's cancellation token fires. Events are reported on
/// `sender` when one is supplied; a closed receiver is not an error.
pub async fn monitor_prayers(state: Arc<AppState>, sender: Option<Sender<MonitorEvent>>) {
    info!("Starting prayer alarm monitor");

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                info!("Prayer alarm monitor shutting down");
                break;
            }
            _ = tokio::time::sleep(CHECK_INTERVAL) => {
                if let Err(e) = run_cycle(&state, sender.as_ref()).await {
                    error!("Alarm monitor cycle failed: {:#}", e);
                    notify(sender.as_ref(), MonitorEvent::Error(e.to_string())).await;
                }
            }
        }
    }
}

async fn run_cycle(state: &AppState, sender: Option<&Sender<MonitorEvent>>) -> Result<()> {
    let settings = state.db.get_settings().await?;

    let (mut timings, mut refreshed) =
        ensure_timings(state, Local::now().date_naive(), &settings).await?;

    // The host and the prayer location can sit in different zones. Once the
    // API-reported timezone is known, re-anchor on its calendar day so the
    // alarms and the firing log use the same date as the clock they are
    // compared against.
    let mut now = now_in_zone(&timings.timezone);
    if now.date() != timings.date {
        let (fresh, fetched) = ensure_timings(state, now.date(), &settings).await?;
        timings = fresh;
        refreshed = refreshed || fetched;
        now = now_in_zone(&timings.timezone);
    }

    if refreshed {
        notify(sender, MonitorEvent::TimingsRefreshed { date: timings.date }).await;
    }

    check_alarms(state, &timings, &settings, now, sender).await
}

/// Today's timings, cache first. Returns whether a network refresh happened.
///
/// A stale cache entry (older than the configured refetch interval) triggers
/// a refetch, but the stale copy is still served when the network is down.
async fn ensure_timings(
    state: &AppState,
    date: NaiveDate,
    settings: &Settings,
) -> Result<(DailyTimings, bool)> {
    let cached = state.db.cached_timings(date).await?;

    if let Some((timings, fetched_at)) = &cached {
        let age = Utc::now() - *fetched_at;
        if age.num_seconds() < settings.refetch_interval as i64 {
            return Ok((timings.clone(), false));
        }
        debug!("Cached timings for {} are {}s old, refetching", date, age.num_seconds());
    }

    match state
        .client
        .fetch_timings(state.coordinate, date, settings)
        .await
    {
        Ok(timings) => {
            state.db.cache_timings(&timings).await?;
            if let Err(e) = state.db.prune_timings(date, CACHE_KEEP_DAYS).await {
                warn!("Failed to prune timings cache: {:#}", e);
            }
            Ok((timings, true))
        }
        Err(e) => match cached {
            Some((timings, _)) => {
                warn!("Timings refetch failed, serving stale cache: {:#}", e);
                Ok((timings, false))
            }
            None => Err(e).context(format!("No cached timings for {}", date)),
        },
    }
}

async fn check_alarms(
    state: &AppState,
    timings: &DailyTimings,
    settings: &Settings,
    now: NaiveDateTime,
    sender: Option<&Sender<MonitorEvent>>,
) -> Result<()> {
    for (prayer, value) in timings.times.alarm_entries() {
        if !settings.alarm_enabled(prayer) {
            continue;
        }

        let time = NaiveTime::parse_from_str(value, "%H:%M")
            .with_context(|| format!("Malformed time {:?} for {}", value, prayer))?;

        if !alarm_due(time, now.time()) {
            continue;
        }
        if state.db.alarm_was_fired(timings.date, prayer).await? {
            debug!("{} alarm already fired today", prayer);
            continue;
        }

        state.audio.set_volume(settings.volume)?;
        state
            .audio
            .play_azan(AzanSound::from_name(&settings.azan_sound))?;
        state.db.mark_alarm_fired(timings.date, prayer).await?;
        log_alarm_fired(prayer.as_str(), value);

        notify(sender, MonitorEvent::AlarmTriggered { prayer, time }).await;
    }
    Ok(())
}

/// Whether `now` falls inside the fire window for a prayer scheduled at
/// `scheduled`: at or after the scheduled minute, within the grace window.
fn alarm_due(scheduled: NaiveTime, now: NaiveTime) -> bool {
    let delta = (now - scheduled).num_seconds();
    (0..=GRACE_WINDOW_SECS).contains(&delta)
}

/// Wall-clock time in the API-reported timezone, falling back to the local
/// zone when the name does not parse.
fn now_in_zone(timezone: &str) -> NaiveDateTime {
    instant_in_zone(Utc::now(), timezone)
}

fn instant_in_zone(instant: DateTime<Utc>, timezone: &str) -> NaiveDateTime {
    match Tz::from_str(timezone) {
        Ok(tz) => instant.with_timezone(&tz).naive_local(),
        Err(_) => {
            warn!("Unknown timezone {:?}, using local time", timezone);
            instant.with_timezone(&Local).naive_local()
        }
    }
}

async fn notify(sender: Option<&Sender<MonitorEvent>>, event: MonitorEvent) {
    if let Some(sender) = sender {
        // The receiver may have been dropped during shutdown.
        let _ = sender.send(event).await;
    }
}
