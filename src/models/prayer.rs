// file: src/models/prayer.rs
use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// The six canonical daily timings, in clock order. Sunrise is displayed but
/// is never an alarm or next-prayer candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// The five prayers eligible for alarms and next-prayer selection.
    pub const ALARM_PRAYERS: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn parse(name: &str) -> Option<PrayerName> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day's prayer times as fetched: prayer name to `HH:mm` string.
///
/// Values stay unparsed until the resolver needs them so that a malformed
/// entry fails loudly at resolution instead of being silently dropped here.
/// Replaced wholesale on refetch or day rollover, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimeSet {
    times: BTreeMap<PrayerName, String>,
}

impl PrayerTimeSet {
    /// Builds a set from the raw `timings` map of the API response. Keys that
    /// are not one of the six canonical names (the API also reports Imsak,
    /// Midnight and the like) are ignored.
    pub fn from_timings<'a, I>(timings: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut times = BTreeMap::new();
        for (name, value) in timings {
            if let Some(prayer) = PrayerName::parse(name) {
                times.insert(prayer, value.trim().to_string());
            }
        }
        if times.is_empty() {
            return Err(AppError::EmptyTimings);
        }
        Ok(PrayerTimeSet { times })
    }

    pub fn get(&self, prayer: PrayerName) -> Option<&str> {
        self.times.get(&prayer).map(String::as_str)
    }

    /// All entries in clock order, Sunrise included.
    pub fn entries(&self) -> impl Iterator<Item = (PrayerName, &str)> {
        self.times.iter().map(|(p, t)| (*p, t.as_str()))
    }

    /// Entries eligible for alarms and next-prayer selection.
    pub fn alarm_entries(&self) -> impl Iterator<Item = (PrayerName, &str)> {
        self.entries().filter(|(p, _)| *p != PrayerName::Sunrise)
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Which calendar day a resolved next prayer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrayerDay {
    Today,
    Tomorrow,
}

/// The resolved next prayer. `time` is always the clock value from the
/// fetched set; when `day` is `Tomorrow` the date rollover happens in
/// [`NextPrayer::target_datetime`], so callers cannot misrender the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPrayer {
    pub name: PrayerName,
    pub time: NaiveTime,
    pub day: PrayerDay,
}

impl NextPrayer {
    /// The concrete instant of this prayer given today's date.
    pub fn target_datetime(&self, today: NaiveDate) -> NaiveDateTime {
        let date = match self.day {
            PrayerDay::Today => today,
            PrayerDay::Tomorrow => today + Days::new(1),
        };
        date.and_time(self.time)
    }
}

impl fmt::Display for NextPrayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day {
            PrayerDay::Today => write!(f, "{} at {}", self.name, self.time.format("%H:%M")),
            PrayerDay::Tomorrow => {
                write!(f, "{} (tomorrow) at {}", self.name, self.time.format("%H:%M"))
            }
        }
    }
}
