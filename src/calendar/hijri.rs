//! Tabular (civil) Islamic calendar arithmetic.
//!
//! Conversions go through Julian day numbers using the standard 30-year
//! intercalation cycle: leap years are those where `(14 + 11y) mod 30 < 11`,
//! odd months have 30 days, even months 29, and Dhu al-Hijjah gains a day in
//! leap years. Civil epoch: 1 Muharram 1 AH = 16 July 622 (Julian).
//!
//! The tabular calendar can differ by a day from sighting-based calendars;
//! display alongside API-reported Hijri dates, not instead of them.

use std::fmt;

use chrono::{Days, NaiveDate};

use crate::error::{AppError, AppResult};

pub const MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

// JDN of the Unix epoch, used to bridge to chrono dates.
const UNIX_EPOCH_JDN: i64 = 2_440_588;
// JDN offset of the civil Hijri epoch in the conversion formulas.
const HIJRI_EPOCH_OFFSET: i64 = 1_948_440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDate {
    pub year: i32,
    pub month: u32, // 1-12
    pub day: u32,   // 1-30
}

impl HijriDate {
    pub fn new(year: i32, month: u32, day: u32) -> AppResult<Self> {
        if year < 1 {
            return Err(AppError::invalid_input(format!(
                "Hijri year {} before epoch",
                year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid_input(format!(
                "Hijri month {} out of range",
                month
            )));
        }
        let max_day = days_in_month(year, month);
        if day < 1 || day > max_day {
            return Err(AppError::invalid_input(format!(
                "Hijri day {} out of range for month {} ({} days)",
                day, month, max_day
            )));
        }
        Ok(HijriDate { year, month, day })
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (14 + 11 * year).rem_euclid(30) < 11
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month % 2 == 1 || (month == 12 && is_leap_year(year)) {
        30
    } else {
        29
    }
}

fn gregorian_to_jdn(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    (date - epoch).num_days() + UNIX_EPOCH_JDN
}

fn jdn_to_gregorian(jdn: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    let delta = jdn - UNIX_EPOCH_JDN;
    if delta >= 0 {
        epoch.checked_add_days(Days::new(delta as u64))
    } else {
        epoch.checked_sub_days(Days::new((-delta) as u64))
    }
}

fn hijri_to_jdn(date: HijriDate) -> i64 {
    let y = date.year as i64;
    let m = date.month as i64;
    let d = date.day as i64;
    (11 * y + 3) / 30 + 354 * y + 30 * m - (m - 1) / 2 + d + HIJRI_EPOCH_OFFSET - 385
}

fn jdn_to_hijri(jdn: i64) -> HijriDate {
    let l0 = jdn - HIJRI_EPOCH_OFFSET + 10632;
    let n = (l0 - 1) / 10631;
    let l1 = l0 - 10631 * n + 354;
    let j = ((10985 - l1) / 5316) * ((50 * l1) / 17719) + (l1 / 5670) * ((43 * l1) / 15238);
    let l2 = l1 - ((30 - j) / 15) * ((17719 * j) / 50) - (j / 16) * ((15238 * j) / 43) + 29;
    let month = (24 * l2) / 709;
    let day = l2 - (709 * month) / 24;
    let year = 30 * n + j - 30;
    HijriDate {
        year: year as i32,
        month: month as u32,
        day: day as u32,
    }
}

/// The tabular Hijri date for a Gregorian date.
pub fn from_gregorian(date: NaiveDate) -> HijriDate {
    jdn_to_hijri(gregorian_to_jdn(date))
}

/// The Gregorian date of a Hijri date. None only for dates outside chrono's
/// representable range.
pub fn to_gregorian(date: HijriDate) -> Option<NaiveDate> {
    jdn_to_gregorian(hijri_to_jdn(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greg(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_year_1446() {
        // Civil tabular: 1 Muharram 1446 AH = 8 July 2024.
        let hijri = from_gregorian(greg(2024, 7, 8));
        assert_eq!(hijri, HijriDate { year: 1446, month: 1, day: 1 });
        assert_eq!(to_gregorian(hijri), Some(greg(2024, 7, 8)));
    }

    #[test]
    fn test_mid_ramadan_1446() {
        let hijri = from_gregorian(greg(2025, 3, 10));
        assert_eq!(hijri, HijriDate { year: 1446, month: 9, day: 10 });
        assert_eq!(hijri.month_name(), "Ramadan");
        assert_eq!(hijri.to_string(), "10 Ramadan 1446 AH");
    }

    #[test]
    fn test_roundtrip_across_a_year() {
        let mut date = greg(2024, 7, 8);
        for _ in 0..400 {
            let hijri = from_gregorian(date);
            assert_eq!(to_gregorian(hijri), Some(date), "roundtrip failed for {date}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_consecutive_days_advance_by_one() {
        let a = hijri_to_jdn(from_gregorian(greg(2025, 1, 1)));
        let b = hijri_to_jdn(from_gregorian(greg(2025, 1, 2)));
        assert_eq!(b - a, 1);
    }

    #[test]
    fn test_leap_year_cycle() {
        // 11 leap years per 30-year cycle.
        let leaps = (1440..1470).filter(|&y| is_leap_year(y)).count();
        assert_eq!(leaps, 11);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(1446, 1), 30); // Muharram
        assert_eq!(days_in_month(1446, 2), 29); // Safar
        assert_eq!(days_in_month(1446, 9), 30); // Ramadan
        // Dhu al-Hijjah has 30 days only in leap years.
        let leap = (1440..1470).find(|&y| is_leap_year(y)).unwrap();
        let common = (1440..1470).find(|&y| !is_leap_year(y)).unwrap();
        assert_eq!(days_in_month(leap, 12), 30);
        assert_eq!(days_in_month(common, 12), 29);
    }

    #[test]
    fn test_hijri_date_validation() {
        assert!(HijriDate::new(1446, 9, 30).is_ok());
        assert!(HijriDate::new(1446, 2, 30).is_err());
        assert!(HijriDate::new(1446, 13, 1).is_err());
        assert!(HijriDate::new(0, 1, 1).is_err());
    }
}
