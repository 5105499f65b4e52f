// file: src/prayer/countdown.rs
use chrono::NaiveDateTime;

/// Returned when `target` is not in the future. The caller is expected to
/// have already re-resolved the next occurrence; this formatter never guesses.
pub const TIME_PASSED: &str = "Time passed";

/// Renders the remaining duration until `target`.
///
/// At one hour or more the seconds are dropped (`"1h 30m remaining"`); under
/// an hour they are shown (`"0m 45s remaining"`). Side-effect-free; the
/// daemon re-invokes it on a one-second tick.
pub fn format_countdown(target: NaiveDateTime, now: NaiveDateTime) -> String {
    let remaining = target - now;
    if remaining.num_seconds() <= 0 {
        return TIME_PASSED.to_string();
    }

    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    let seconds = remaining.num_seconds() % 60;

    if hours >= 1 {
        format!("{}h {}m remaining", hours, minutes)
    } else {
        format!("{}m {}s remaining", minutes, seconds)
    }
}
