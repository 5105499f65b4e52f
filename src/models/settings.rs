// file: src/models/settings.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::prayer::PrayerName;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub azan_sound: String,    // "makkah" | "madinah" | "egypt" | "turkey"
    pub volume: f32,           // 0.0 to 1.0
    pub alarm_fajr: bool,
    pub alarm_dhuhr: bool,
    pub alarm_asr: bool,
    pub alarm_maghrib: bool,
    pub alarm_isha: bool,
    pub hijri_calendar: bool,  // calendar display mode
    pub method: i32,           // calculation method id (Aladhan)
    pub school: i32,           // juristic school: 0 Shafi, 1 Hanafi
    pub adjustment: i32,       // minute tune applied by the API
    pub refetch_interval: i32, // seconds between timing refetches
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            azan_sound: "makkah".to_string(),
            volume: 0.7, // 70% volume by default
            alarm_fajr: true,
            alarm_dhuhr: true,
            alarm_asr: true,
            alarm_maghrib: true,
            alarm_isha: true,
            hijri_calendar: false,
            method: 2, // ISNA
            school: 0, // Shafi
            adjustment: 0,
            refetch_interval: 21600, // 6 hours
        }
    }
}

impl Settings {
    /// Whether the alarm toggle for the given prayer is on. Sunrise has no
    /// toggle and is always off.
    pub fn alarm_enabled(&self, prayer: PrayerName) -> bool {
        match prayer {
            PrayerName::Fajr => self.alarm_fajr,
            PrayerName::Sunrise => false,
            PrayerName::Dhuhr => self.alarm_dhuhr,
            PrayerName::Asr => self.alarm_asr,
            PrayerName::Maghrib => self.alarm_maghrib,
            PrayerName::Isha => self.alarm_isha,
        }
    }
}
