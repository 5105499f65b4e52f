//! Month-grid layout for the Gregorian and Hijri calendars.
//!
//! A [`MonthGrid`] is a render-agnostic description of a month view: the
//! title line, how many blank cells precede day 1 in a Sunday-first week,
//! the number of days, and which day (if any) is today. Hijri grids are
//! laid out with the tabular calendar in [`hijri`].

use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, AppResult};

pub mod hijri;
pub mod holidays;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKind {
    Gregorian,
    Hijri,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Title line, e.g. "March 2025" or "Ramadan 1446 AH".
    pub title: String,
    /// Blank cells before day 1 in a Sunday-first week row.
    pub leading_blanks: usize,
    /// Number of days in the month.
    pub days: u32,
    /// Day number to highlight when `today` falls in this month.
    pub today: Option<u32>,
}

impl MonthGrid {
    /// Day cells split into Sunday-first week rows; `None` cells are blanks.
    pub fn weeks(&self) -> Vec<Vec<Option<u32>>> {
        let cells: Vec<Option<u32>> = std::iter::repeat(None)
            .take(self.leading_blanks)
            .chain((1..=self.days).map(Some))
            .collect();
        let mut weeks: Vec<Vec<Option<u32>>> =
            cells.chunks(7).map(|chunk| chunk.to_vec()).collect();
        if let Some(last) = weeks.last_mut() {
            last.resize(7, None);
        }
        weeks
    }
}

/// Lays out the month containing day 1 of (`year`, `month`) on the given
/// calendar. `today` is a Gregorian date and is mapped onto the grid's
/// calendar before comparison.
pub fn month_grid(
    kind: CalendarKind,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> AppResult<MonthGrid> {
    match kind {
        CalendarKind::Gregorian => gregorian_grid(year, month, today),
        CalendarKind::Hijri => hijri_grid(year, month, today),
    }
}

const GREGORIAN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn gregorian_grid(year: i32, month: u32, today: NaiveDate) -> AppResult<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AppError::invalid_input(format!("Invalid Gregorian month {}-{}", year, month))
    })?;

    let days = days_in_gregorian_month(year, month);
    let marker = (today.year() == year && today.month() == month).then(|| today.day());

    Ok(MonthGrid {
        title: format!("{} {}", GREGORIAN_MONTHS[(month - 1) as usize], year),
        leading_blanks: first.weekday().num_days_from_sunday() as usize,
        days,
        today: marker,
    })
}

fn hijri_grid(year: i32, month: u32, today: NaiveDate) -> AppResult<MonthGrid> {
    // Validates year/month; day 1 always exists.
    let first = hijri::HijriDate::new(year, month, 1)?;
    let first_gregorian = hijri::to_gregorian(first).ok_or_else(|| {
        AppError::invalid_input(format!("Hijri month {}-{} out of range", year, month))
    })?;

    let today_hijri = hijri::from_gregorian(today);
    let marker =
        (today_hijri.year == year && today_hijri.month == month).then_some(today_hijri.day);

    Ok(MonthGrid {
        title: format!("{} {} AH", first.month_name(), year),
        leading_blanks: first_gregorian.weekday().num_days_from_sunday() as usize,
        days: hijri::days_in_month(year, month),
        today: marker,
    })
}

fn days_in_gregorian_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (next, NaiveDate::from_ymd_opt(year, month, 1)) {
        (Some(next), Some(first)) => (next - first).num_days() as u32,
        _ => 30,
    }
}
