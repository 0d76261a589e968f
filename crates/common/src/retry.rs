use crate::config::Config;
use dsc_error::{ConnectorError, ErrorCode, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};
use validator::{Validate, ValidationError};

pub const MAX_RETRIES_SETTING: &str = "edc.core.retry.retries.max";
pub const BACKOFF_MIN_MILLIS_SETTING: &str = "edc.core.retry.backoff.min";
pub const BACKOFF_MAX_MILLIS_SETTING: &str = "edc.core.retry.backoff.max";

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_MIN_MS: u64 = 500;
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_backoff_bounds"))]
pub struct RetrySettings {
    #[validate(range(max = 100))]
    pub max_retries: u32,
    pub backoff_min_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_min_ms: DEFAULT_BACKOFF_MIN_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
        }
    }
}

impl RetrySettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = Self {
            max_retries: config
                .get_parsed(MAX_RETRIES_SETTING, "integer")?
                .unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_min_ms: config
                .get_parsed(BACKOFF_MIN_MILLIS_SETTING, "long")?
                .unwrap_or(DEFAULT_BACKOFF_MIN_MS),
            backoff_max_ms: config
                .get_parsed(BACKOFF_MAX_MILLIS_SETTING, "long")?
                .unwrap_or(DEFAULT_BACKOFF_MAX_MS),
        };

        settings.validate().map_err(|e| {
            ConnectorError::new(
                ErrorCode::InvalidSetting,
                format!("Retry configuration validation failed: {}", e),
            )
        })?;
        Ok(settings)
    }

    /// Settings that never retry, handy for tests.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            backoff_min_ms: 0,
            backoff_max_ms: 0,
        }
    }
}

fn validate_backoff_bounds(settings: &RetrySettings) -> std::result::Result<(), ValidationError> {
    if settings.backoff_min_ms > settings.backoff_max_ms {
        return Err(ValidationError::new("backoff_min_exceeds_max"));
    }
    Ok(())
}

/// Calculate the delay for the next retry attempt with exponential backoff.
pub fn next_retry_delay(attempt: usize, min_ms: u64, max_ms: u64) -> Duration {
    let multiplier = 2_u64.saturating_pow(attempt.saturating_sub(1) as u32);
    let delay = min_ms.saturating_mul(multiplier);
    // jitter of up to one minimum backoff
    let jitter = if min_ms > 0 {
        rand::random::<u64>() % min_ms
    } else {
        0
    };
    Duration::from_millis(delay.saturating_add(jitter).min(max_ms))
}

/// Execute an async operation, retrying up to `settings.max_retries` times.
pub async fn retry_async<T, E, F, Fut>(
    operation_name: &str,
    settings: RetrySettings,
    operation: F,
) -> std::result::Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = settings.max_retries as usize + 1;
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts {
                    error!(
                        "Failed to execute '{}' after {} attempts: {}",
                        operation_name, max_attempts, e
                    );
                    return Err(e);
                }
                let delay =
                    next_retry_delay(attempt, settings.backoff_min_ms, settings.backoff_max_ms);
                warn!(
                    "Operation '{}' failed. Retrying in {:?} (Attempt {}/{}): {}",
                    operation_name, delay, attempt, max_attempts, e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
