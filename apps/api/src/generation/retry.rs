//! Retry policy for provider calls.
//!
//! Exponential backoff with jitter. Auth failures (401/403) abort immediately;
//! everything else, including rate limits, server errors, and transport
//! failures, is retried up to the configured budget.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{error, warn};

use crate::llm_client::ProviderError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Whether a failed attempt is worth repeating. Only credential failures are
/// final; an unclassifiable error gets the benefit of the doubt.
pub fn is_retryable(err: &ProviderError) -> bool {
    !matches!(err.status(), Some(401) | Some(403))
}

/// Runs `op`, retrying on retryable failures. Attempt `n` (zero-based) waits
/// `base_delay * 2^n` plus up to one second of jitter before the next try.
pub async fn with_retry<F, Fut, T>(
    mut op: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retryable(&err) => {
                error!(error = %err, "non-retryable provider error");
                return Err(err);
            }
            Err(err) if attempt >= max_retries => {
                error!(error = %err, attempts = attempt + 1, "retry budget exhausted");
                return Err(err);
            }
            Err(err) => {
                let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
                let delay = base_delay * 2u32.pow(attempt) + jitter;
                warn!(
                    error = %err,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "provider call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
