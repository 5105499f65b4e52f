//! Exponential backoff for the prayer-times fetch.
//!
//! The Aladhan free tier rate-limits and the daemon may wake before the
//! network is up, so the fetch distinguishes errors worth retrying from
//! those that are not. The error type decides via [`Transient`]; the loop
//! here only owns the pacing.

use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;

/// Whether retrying the failed operation can plausibly succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Runs `operation` until it succeeds, fails permanently, or exhausts the
/// configured attempts. The last error is returned as-is so the caller keeps
/// its type.
pub async fn retry_with_exponential_backoff<T, E, F, Fut>(
    config: &RetryConfig,
    operation: F,
) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let mut delay = config.base_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Prayer times fetch succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < config.max_attempts && e.is_transient() => {
                debug!(
                    "Fetch attempt {} failed transiently, retrying in {:?}: {}",
                    attempt, delay, e
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(
                    Duration::from_millis(
                        (delay.as_millis() as f64 * config.backoff_multiplier) as u64,
                    ),
                    config.max_delay,
                );
                attempt += 1;
            }
            Err(e) => {
                warn!("Giving up after {} attempt(s): {}", attempt, e);
                return Err(e);
            }
        }
    }
}
