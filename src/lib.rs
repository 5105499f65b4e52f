//! Prayer-times core: next-prayer resolution, countdown formatting, qibla
//! bearing, Aladhan API client, sqlite-backed settings and timings cache,
//! and a background alarm monitor that plays the adhan.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub mod alarms;
pub mod api;
pub mod audio;
pub mod calendar;
pub mod config;
pub mod database;
pub mod error;
pub mod http_config;
pub mod models;
pub mod prayer;
pub mod utils;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use models::{
    DailyTimings, GeoCoordinate, NextPrayer, PrayerDay, PrayerName, PrayerTimeSet, Settings,
};
pub use prayer::{format_countdown, qibla_bearing, resolve, KAABA, TIME_PASSED};

/// Shared handles for the daemon and the alarm monitor.
pub struct AppState {
    pub db: Arc<database::Database>,
    pub audio: Arc<audio::AudioManager>,
    pub client: Arc<api::PrayerTimesClient>,
    pub coordinate: GeoCoordinate,
    pub shutdown: CancellationToken,
}
