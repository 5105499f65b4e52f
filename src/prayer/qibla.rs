// file: src/prayer/qibla.rs
use crate::models::GeoCoordinate;

/// The Kaaba in Makkah, the fixed reference every bearing points toward.
pub const KAABA: GeoCoordinate = GeoCoordinate {
    latitude: 21.4225,
    longitude: 39.8262,
};

/// Initial great-circle bearing (forward azimuth) from `from` toward the
/// Kaaba, in degrees `[0, 360)` clockwise from true north.
///
/// A coordinate exactly coincident with the Kaaba is degenerate: the formula
/// collapses to `atan2(0, 0)` and yields 0.0. That default is deliberate and
/// not treated as an error; compare against [`KAABA`] first if it matters.
pub fn qibla_bearing(from: GeoCoordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = KAABA.latitude.to_radians();
    let delta_lambda = (KAABA.longitude - from.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Maps any raw angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}
