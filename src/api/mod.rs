//! Aladhan prayer-times API client.
//!
//! Fetches one day of timings for a coordinate. Responses are memoized in a
//! single slot keyed by (date, coordinate, method, school, adjustment) so the
//! monitor loop can re-ask freely without hitting the network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::{DailyTimings, GeoCoordinate, PrayerTimeSet, Settings};
use crate::utils::logging::log_timings_fetch;
use crate::utils::retry::{retry_with_exponential_backoff, RetryConfig, Transient};

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    status: String,
    data: ApiData,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    timings: HashMap<String, String>,
    date: ApiDate,
    meta: ApiMeta,
}

#[derive(Debug, Deserialize)]
struct ApiDate {
    readable: String,
    hijri: Option<ApiHijri>,
}

#[derive(Debug, Deserialize)]
struct ApiHijri {
    day: String,
    year: String,
    month: ApiHijriMonth,
}

#[derive(Debug, Deserialize)]
struct ApiHijriMonth {
    en: String,
}

#[derive(Debug, Deserialize)]
struct ApiMeta {
    timezone: String,
}

/// A failed round trip to the timings endpoint. Transport failures and
/// server-side statuses are retryable; client-side statuses (bad
/// coordinates, unknown method id) are not.
#[derive(Debug, Error)]
enum FetchError {
    #[error("timings request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("timings endpoint returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },
}

impl Transient for FetchError {
    fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_timeout() || e.is_connect(),
            FetchError::Http { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}

impl From<FetchError> for AppError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Transport(e) => AppError::Network(e),
            FetchError::Http { status, body } => {
                AppError::api(format!("HTTP {}: {}", status, body))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoKey {
    date: NaiveDate,
    // Coordinates rounded to 1e-4 degree (~11m); a new GPS fix within that
    // radius reuses the memo.
    lat_e4: i64,
    lon_e4: i64,
    method: i32,
    school: i32,
    adjustment: i32,
}

impl MemoKey {
    fn new(coordinate: GeoCoordinate, date: NaiveDate, settings: &Settings) -> Self {
        MemoKey {
            date,
            lat_e4: (coordinate.latitude * 1e4).round() as i64,
            lon_e4: (coordinate.longitude * 1e4).round() as i64,
            method: settings.method,
            school: settings.school,
            adjustment: settings.adjustment,
        }
    }
}

pub struct PrayerTimesClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
    memo: Mutex<Option<(MemoKey, DailyTimings)>>,
}

impl PrayerTimesClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::config(format!("invalid API base URL {}: {}", base_url, e)))?;
        if !parsed.scheme().starts_with("http") {
            return Err(AppError::config(format!(
                "API base URL must be http(s): {}",
                base_url
            )));
        }

        let http = HttpConfig::prayer_api();
        let client = http
            .build_client()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(PrayerTimesClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: http.to_retry_config(),
            memo: Mutex::new(None),
        })
    }

    /// Fetch the timings for `date` at `coordinate`, consulting the memo
    /// first. Transient HTTP failures are retried with exponential backoff.
    pub async fn fetch_timings(
        &self,
        coordinate: GeoCoordinate,
        date: NaiveDate,
        settings: &Settings,
    ) -> AppResult<DailyTimings> {
        let key = MemoKey::new(coordinate, date, settings);
        if let Some((cached_key, cached)) = self.memo.lock().unwrap().as_ref() {
            if *cached_key == key {
                debug!("Timings memo hit for {}", date);
                return Ok(cached.clone());
            }
        }

        let url = self.timings_url(coordinate, date, settings);
        debug!("Fetching prayer times: {}", url);

        let started = Instant::now();
        let client = self.client.clone();
        let body = retry_with_exponential_backoff(&self.retry, move || {
            let client = client.clone();
            let url = url.clone();
            Box::pin(async move {
                let response = client.get(&url).send().await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "unable to read error response".to_string());
                    return Err(FetchError::Http { status, body });
                }

                Ok(response.text().await?)
            })
        })
        .await
        .map_err(AppError::from)?;

        let timings = parse_envelope(&body, date)?;
        log_timings_fetch(
            &timings.readable,
            &timings.timezone,
            started.elapsed().as_millis() as u64,
        );

        *self.memo.lock().unwrap() = Some((key, timings.clone()));
        Ok(timings)
    }

    fn timings_url(
        &self,
        coordinate: GeoCoordinate,
        date: NaiveDate,
        settings: &Settings,
    ) -> String {
        format!(
            "{}/timings/{:02}-{:02}-{}?latitude={}&longitude={}&method={}&school={}&adjustment={}",
            self.base_url,
            date.day(),
            date.month(),
            date.year(),
            coordinate.latitude,
            coordinate.longitude,
            settings.method,
            settings.school,
            settings.adjustment,
        )
    }
}

/// Parses the API envelope into a [`DailyTimings`]. HTML error pages and
/// non-200 envelope codes are reported as typed API errors rather than serde
/// noise.
fn parse_envelope(body: &str, date: NaiveDate) -> AppResult<DailyTimings> {
    let trimmed = body.trim_start();
    if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html") {
        return Err(AppError::api(
            "server returned HTML instead of JSON; check the API base URL",
        ));
    }

    let envelope: ApiEnvelope = serde_json::from_str(body)
        .map_err(|e| AppError::api(format!("malformed timings payload: {}", e)))?;

    if envelope.code != 200 {
        return Err(AppError::api(format!(
            "API returned code {}: {}",
            envelope.code, envelope.status
        )));
    }

    // Some endpoints suffix a timezone abbreviation ("05:02 (EET)"); keep
    // only the clock value.
    let times = PrayerTimeSet::from_timings(
        envelope
            .data
            .timings
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str(),
                    value.split_whitespace().next().unwrap_or(""),
                )
            }),
    )?;

    let hijri_readable = envelope
        .data
        .date
        .hijri
        .map(|h| format!("{} {} {}", h.day, h.month.en, h.year));

    Ok(DailyTimings {
        date,
        readable: envelope.data.date.readable,
        timezone: envelope.data.meta.timezone,
        hijri_readable,
        times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;

    fn fixture() -> &'static str {
        r#"{
            "code": 200,
            "status": "OK",
            "data": {
                "timings": {
                    "Fajr": "05:00",
                    "Sunrise": "06:25",
                    "Dhuhr": "12:30",
                    "Asr": "16:00",
                    "Sunset": "18:45",
                    "Maghrib": "18:45",
                    "Isha": "20:15",
                    "Imsak": "04:50",
                    "Midnight": "00:37"
                },
                "date": {
                    "readable": "10 Mar 2025",
                    "timestamp": "1741590000",
                    "hijri": {
                        "date": "10-09-1446",
                        "day": "10",
                        "month": { "number": 9, "en": "Ramadan" },
                        "year": "1446"
                    }
                },
                "meta": {
                    "timezone": "America/New_York",
                    "method": { "id": 2, "name": "Islamic Society of North America (ISNA)" }
                }
            }
        }"#
    }

    #[test]
    fn test_parse_envelope_extracts_timings_and_metadata() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let timings = parse_envelope(fixture(), date).unwrap();

        assert_eq!(timings.date, date);
        assert_eq!(timings.readable, "10 Mar 2025");
        assert_eq!(timings.timezone, "America/New_York");
        assert_eq!(timings.hijri_readable.as_deref(), Some("10 Ramadan 1446"));
        assert_eq!(timings.times.get(PrayerName::Asr), Some("16:00"));
        // Non-canonical keys (Imsak, Midnight, Sunset) are dropped.
        assert_eq!(timings.times.entries().count(), 6);
    }

    #[test]
    fn test_parse_envelope_strips_timezone_suffix() {
        let body = fixture().replace("\"05:00\"", "\"05:00 (EST)\"");
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let timings = parse_envelope(&body, date).unwrap();
        assert_eq!(timings.times.get(PrayerName::Fajr), Some("05:00"));
    }

    #[test]
    fn test_parse_envelope_rejects_html() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let err = parse_envelope("<html><body>error</body></html>", date).unwrap_err();
        assert!(matches!(err, AppError::Api(_)));
    }

    #[test]
    fn test_parse_envelope_rejects_error_code() {
        let body = fixture().replace("\"code\": 200", "\"code\": 400");
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let err = parse_envelope(&body, date).unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        assert!(PrayerTimesClient::new("not a url").is_err());
        assert!(PrayerTimesClient::new("ftp://example.com").is_err());
        assert!(PrayerTimesClient::new("https://api.aladhan.com/v1").is_ok());
    }

    #[test]
    fn test_timings_url_shape() {
        let client = PrayerTimesClient::new("https://api.aladhan.com/v1/").unwrap();
        let coord = GeoCoordinate::new(40.7128, -74.0060).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let url = client.timings_url(coord, date, &Settings::default());

        assert!(url.starts_with("https://api.aladhan.com/v1/timings/05-03-2025?"));
        assert!(url.contains("latitude=40.7128"));
        assert!(url.contains("longitude=-74.006"));
        assert!(url.contains("method=2"));
        assert!(url.contains("school=0"));
    }

    #[test]
    fn test_fetch_error_transience_by_status() {
        let http = |status: StatusCode| FetchError::Http {
            status,
            body: String::new(),
        };

        // Rate limits and server-side failures are worth retrying.
        assert!(http(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(http(StatusCode::SERVICE_UNAVAILABLE).is_transient());
        assert!(http(StatusCode::BAD_GATEWAY).is_transient());
        // Client-side rejections will not improve on retry.
        assert!(!http(StatusCode::BAD_REQUEST).is_transient());
        assert!(!http(StatusCode::NOT_FOUND).is_transient());
    }

    #[test]
    fn test_fetch_error_maps_to_typed_app_error() {
        let err: AppError = FetchError::Http {
            status: StatusCode::BAD_REQUEST,
            body: "invalid latitude".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Api(_)));
        assert!(err.to_string().contains("invalid latitude"));
    }

    #[test]
    fn test_memo_key_rounds_coordinates() {
        let settings = Settings::default();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let a = MemoKey::new(GeoCoordinate::new(40.71281, -74.00601).unwrap(), date, &settings);
        let b = MemoKey::new(GeoCoordinate::new(40.71279, -74.00599).unwrap(), date, &settings);
        let far = MemoKey::new(GeoCoordinate::new(40.8, -74.0060).unwrap(), date, &settings);
        assert_eq!(a, b);
        assert_ne!(a, far);
    }
}
