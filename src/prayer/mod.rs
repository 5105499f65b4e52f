//! The calculation core: next-prayer resolution, countdown formatting and
//! Qibla bearing. Everything here is a pure function of its inputs; callers
//! own the clock, the timers and the I/O.

pub mod countdown;
pub mod qibla;
pub mod resolver;

pub use countdown::{format_countdown, TIME_PASSED};
pub use qibla::{normalize_degrees, qibla_bearing, KAABA};
pub use resolver::resolve;
