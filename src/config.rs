//! Application configuration
//!
//! The daemon is headless, so everything that a mobile build would get from
//! platform services (location, storage paths) comes from the environment:
//! `OPENADHAN_LAT` / `OPENADHAN_LON` are required, `OPENADHAN_DB` and
//! `OPENADHAN_API_URL` are optional overrides.

use log::info;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::GeoCoordinate;

pub const DEFAULT_API_BASE_URL: &str = "https://api.aladhan.com/v1";
pub const DEFAULT_DB_PATH: &str = "openadhan.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub coordinate: GeoCoordinate,
    pub db_path: String,
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let latitude = required_f64("OPENADHAN_LAT")?;
        let longitude = required_f64("OPENADHAN_LON")?;
        let coordinate = GeoCoordinate::new(latitude, longitude)
            .map_err(|e| AppError::config(e.to_string()))?;

        let db_path =
            std::env::var("OPENADHAN_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let api_base_url = std::env::var("OPENADHAN_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let config = AppConfig {
            coordinate,
            db_path,
            api_base_url,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            AppError::config(format!("invalid API base URL {}: {}", self.api_base_url, e))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(AppError::config(format!(
                "API base URL must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.db_path.trim().is_empty() {
            return Err(AppError::config("database path cannot be empty"));
        }
        info!(
            "Configuration valid: lat {:.4}, lon {:.4}, api {}",
            self.coordinate.latitude, self.coordinate.longitude, self.api_base_url
        );
        Ok(())
    }
}

fn required_f64(var: &str) -> AppResult<f64> {
    let raw = std::env::var(var)
        .map_err(|_| AppError::config(format!("{} is not set", var)))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::config(format!("{} is not a number: {}", var, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "OPENADHAN_LAT",
            "OPENADHAN_LON",
            "OPENADHAN_DB",
            "OPENADHAN_API_URL",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_coordinates() {
        clear_env();
        let result = AppConfig::from_env();
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_from_env_with_valid_coordinates() {
        clear_env();
        std::env::set_var("OPENADHAN_LAT", "40.7128");
        std::env::set_var("OPENADHAN_LON", "-74.0060");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.coordinate.latitude, 40.7128);
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_out_of_range_latitude() {
        clear_env();
        std::env::set_var("OPENADHAN_LAT", "123.0");
        std::env::set_var("OPENADHAN_LON", "10.0");

        assert!(AppConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_api_url() {
        clear_env();
        let config = AppConfig {
            coordinate: GeoCoordinate::new(0.0, 0.0).unwrap(),
            db_path: "test.db".to_string(),
            api_base_url: "ftp://example.com".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
