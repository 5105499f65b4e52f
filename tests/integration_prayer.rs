//! End-to-end checks of the prayer calculation surface: resolver, countdown
//! formatter, and qibla bearing working together on a realistic day.

use chrono::{Duration, NaiveDate, NaiveTime};

use openadhan::prayer::{
    format_countdown, normalize_degrees, qibla_bearing, resolve, KAABA, TIME_PASSED,
};
use openadhan::{GeoCoordinate, PrayerDay, PrayerName, PrayerTimeSet};

fn standard_day() -> PrayerTimeSet {
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
fn afternoon_resolves_to_asr_today() {
    let next = resolve(&standard_day(), at(15, 0)).unwrap();
    assert_eq!(next.name, PrayerName::Asr);
    assert_eq!(next.time, at(16, 0));
    assert_eq!(next.day, PrayerDay::Today);
}

#[test]
fn after_isha_wraps_to_fajr_tomorrow() {
    let next = resolve(&standard_day(), at(21, 0)).unwrap();
    assert_eq!(next.name, PrayerName::Fajr);
    assert_eq!(next.day, PrayerDay::Tomorrow);

    // The wrapped target lands on the next calendar day.
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let target = next.target_datetime(today);
    assert_eq!(target.date(), NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    assert_eq!(target.time(), at(5, 0));
}

#[test]
fn countdown_to_resolved_prayer_is_monotonic() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let next = resolve(&standard_day(), at(15, 0)).unwrap();
    let target = next.target_datetime(today);

    let mut previous = i64::MAX;
    let mut now = today.and_time(at(15, 0));
    while now < target {
        let remaining = (target - now).num_seconds();
        assert!(remaining <= previous, "countdown went up at {}", now);
        assert_ne!(format_countdown(target, now), TIME_PASSED);
        previous = remaining;
        now += Duration::seconds(97);
    }
    assert_eq!(format_countdown(target, target), TIME_PASSED);
    assert_eq!(
        format_countdown(target, target + Duration::seconds(30)),
        TIME_PASSED
    );
}

#[test]
fn countdown_switches_format_under_one_hour() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let target = today.and_time(at(16, 0));

    assert_eq!(
        format_countdown(target, today.and_time(at(14, 30))),
        "1h 30m remaining"
    );
    assert_eq!(
        format_countdown(target, today.and_time(at(15, 30))),
        "30m 0s remaining"
    );
}

#[test]
fn qibla_bearing_from_new_york() {
    let nyc = GeoCoordinate::new(40.7128, -74.0060).unwrap();
    let bearing = qibla_bearing(nyc);
    assert!((bearing - 58.5).abs() < 1.0, "got {}", bearing);
}

#[test]
fn qibla_bearing_from_kaaba_is_normalized() {
    let bearing = qibla_bearing(KAABA);
    assert!((0.0..360.0).contains(&bearing));
}

#[test]
fn bearing_normalization_is_periodic() {
    for x in [-725.0, -360.0, -90.5, 0.0, 45.0, 359.999, 360.0, 1081.5] {
        let n = normalize_degrees(x);
        assert!((0.0..360.0).contains(&n), "normalize({}) = {}", x, n);
        assert!((normalize_degrees(x + 360.0) - n).abs() < 1e-9);
    }
}
