//! Fixed-date Islamic observances on the Hijri calendar.

/// (month, day) on the Hijri calendar.
const OBSERVANCES: &[(u32, u32, &str)] = &[
    (1, 1, "Islamic New Year"),
    (1, 10, "Day of Ashura"),
    (3, 12, "Mawlid al-Nabi"),
    (7, 27, "Isra wal-Miraj"),
    (9, 1, "First day of Ramadan"),
    (9, 27, "Laylat al-Qadr"),
    (10, 1, "Eid al-Fitr"),
    (12, 9, "Day of Arafah"),
    (12, 10, "Eid al-Adha"),
];

/// The observance falling on the given Hijri month and day, if any.
pub fn observance_on(month: u32, day: u32) -> Option<&'static str> {
    OBSERVANCES
        .iter()
        .find(|&&(m, d, _)| m == month && d == day)
        .map(|&(_, _, name)| name)
}

/// All observances in the given Hijri month, as (day, name) pairs.
pub fn observances_in_month(month: u32) -> Vec<(u32, &'static str)> {
    OBSERVANCES
        .iter()
        .filter(|&&(m, _, _)| m == month)
        .map(|&(_, d, name)| (d, name))
        .collect()
}
