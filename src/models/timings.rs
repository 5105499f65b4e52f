// file: src/models/timings.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::prayer::PrayerTimeSet;

/// A fetched day of prayer times plus the metadata the API reports alongside
/// them. The timezone name and readable dates are carried for display and for
/// computing "now" in the right zone; the core never interprets them further.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTimings {
    pub date: NaiveDate,
    /// Human-readable Gregorian date as reported, e.g. "10 Mar 2025".
    pub readable: String,
    /// IANA timezone name of the supplied coordinates, e.g. "America/New_York".
    pub timezone: String,
    /// Human-readable Hijri date as reported, e.g. "10 Ramadan 1446".
    pub hijri_readable: Option<String>,
    pub times: PrayerTimeSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_timings_serde_roundtrip() {
        let timings = DailyTimings {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            readable: "10 Mar 2025".to_string(),
            timezone: "Europe/London".to_string(),
            hijri_readable: Some("10 Ramadan 1446".to_string()),
            times: PrayerTimeSet::from_timings(vec![("Fajr", "05:00"), ("Isha", "20:15")])
                .unwrap(),
        };

        let json = serde_json::to_string(&timings).unwrap();
        let back: DailyTimings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.date, timings.date);
        assert_eq!(back.timezone, "Europe/London");
        assert_eq!(back.times, timings.times);
    }
}
