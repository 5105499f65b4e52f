// file: src/models/location.rs
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A WGS-84 coordinate pair in degrees. Supplied by the surrounding
/// application; only range sanity is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::invalid_input(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::invalid_input(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }
        Ok(GeoCoordinate {
            latitude,
            longitude,
        })
    }
}
