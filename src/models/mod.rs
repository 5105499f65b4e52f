// file: src/models/mod.rs

// Declare modules
pub mod location;
pub mod prayer;
pub mod settings;
pub mod timings;

// Re-export all public types so callers can keep flat imports like
// `use openadhan::PrayerTimeSet`.
pub use location::GeoCoordinate;
pub use prayer::{NextPrayer, PrayerDay, PrayerName, PrayerTimeSet};
pub use settings::{Setting, Settings};
pub use timings::DailyTimings;
