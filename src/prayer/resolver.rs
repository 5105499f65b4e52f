// file: src/prayer/resolver.rs
use chrono::NaiveTime;

use crate::error::{AppError, AppResult};
use crate::models::{NextPrayer, PrayerDay, PrayerTimeSet};

const TIME_FORMAT: &str = "%H:%M";

/// Determines the next prayer relative to `now`.
///
/// Entries strictly later than `now` compete and the earliest wins. When all
/// of today's prayers have passed, the earliest entry of the set (Fajr under
/// normal input) is returned tagged [`PrayerDay::Tomorrow`]; its clock value
/// is today's, and the date rollover is applied by
/// [`NextPrayer::target_datetime`].
///
/// Sunrise is not a candidate. A malformed `HH:mm` string is a
/// [`AppError::TimeParse`]; a set without usable entries is
/// [`AppError::EmptyTimings`].
pub fn resolve(times: &PrayerTimeSet, now: NaiveTime) -> AppResult<NextPrayer> {
    let mut parsed = Vec::with_capacity(5);
    for (prayer, value) in times.alarm_entries() {
        let time = NaiveTime::parse_from_str(value, TIME_FORMAT)
            .map_err(|_| AppError::time_parse(prayer.as_str(), value))?;
        parsed.push((prayer, time));
    }

    if parsed.is_empty() {
        return Err(AppError::EmptyTimings);
    }

    let upcoming = parsed
        .iter()
        .filter(|(_, time)| *time > now)
        .min_by_key(|(_, time)| *time);

    if let Some(&(name, time)) = upcoming {
        return Ok(NextPrayer {
            name,
            time,
            day: PrayerDay::Today,
        });
    }

    // All passed: wrap around to the first prayer of the next day.
    let &(name, time) = parsed
        .iter()
        .min_by_key(|(_, time)| *time)
        .expect("parsed is non-empty");

    Ok(NextPrayer {
        name,
        time,
        day: PrayerDay::Tomorrow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;

    fn sample_set() -> PrayerTimeSet {
        PrayerTimeSet::from_timings(vec![
            ("Fajr", "05:00"),
            ("Sunrise", "06:25"),
            ("Dhuhr", "12:30"),
            ("Asr", "16:00"),
            ("Maghrib", "18:45"),
            ("Isha", "20:15"),
        ])
        .unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_resolve_picks_earliest_upcoming() {
        let next = resolve(&sample_set(), at(15, 0)).unwrap();
        assert_eq!(next.name, PrayerName::Asr);
        assert_eq!(next.time, at(16, 0));
        assert_eq!(next.day, PrayerDay::Today);
    }

    #[test]
    fn test_resolve_before_fajr() {
        let next = resolve(&sample_set(), at(3, 30)).unwrap();
        assert_eq!(next.name, PrayerName::Fajr);
        assert_eq!(next.day, PrayerDay::Today);
    }

    #[test]
    fn test_resolve_wraps_to_fajr_tomorrow_after_isha() {
        let next = resolve(&sample_set(), at(21, 0)).unwrap();
        assert_eq!(next.name, PrayerName::Fajr);
        assert_eq!(next.time, at(5, 0));
        assert_eq!(next.day, PrayerDay::Tomorrow);
    }

    #[test]
    fn test_resolve_exact_prayer_time_is_not_upcoming() {
        // Strictly-later comparison: at 16:00 exactly, Asr has started.
        let next = resolve(&sample_set(), at(16, 0)).unwrap();
        assert_eq!(next.name, PrayerName::Maghrib);
    }

    #[test]
    fn test_resolve_skips_sunrise() {
        let next = resolve(&sample_set(), at(5, 30)).unwrap();
        assert_eq!(next.name, PrayerName::Dhuhr);
    }

    #[test]
    fn test_resolve_propagates_parse_failure() {
        let set = PrayerTimeSet::from_timings(vec![("Fajr", "5 o'clock"), ("Isha", "20:15")])
            .unwrap();
        let err = resolve(&set, at(12, 0)).unwrap_err();
        match err {
            AppError::TimeParse { prayer, value } => {
                assert_eq!(prayer, "Fajr");
                assert_eq!(value, "5 o'clock");
            }
            other => panic!("expected TimeParse, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_sunrise_only_set_is_empty() {
        let set = PrayerTimeSet::from_timings(vec![("Sunrise", "06:25")]).unwrap();
        assert!(matches!(resolve(&set, at(4, 0)), Err(AppError::EmptyTimings)));
    }

    #[test]
    fn test_resolve_partial_set_wraps_to_earliest_entry() {
        // Degraded input without Fajr: wraparound still picks the earliest.
        let set =
            PrayerTimeSet::from_timings(vec![("Dhuhr", "12:30"), ("Asr", "16:00")]).unwrap();
        let next = resolve(&set, at(22, 0)).unwrap();
        assert_eq!(next.name, PrayerName::Dhuhr);
        assert_eq!(next.day, PrayerDay::Tomorrow);
    }
}
