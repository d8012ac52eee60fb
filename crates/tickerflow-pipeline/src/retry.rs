//! Retry with exponential backoff.

use std::future::Future;
use std::time::Duration;
use tickerflow_core::error::Transient;
use tracing::warn;

/// Backoff schedule for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each retry after that.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Delay before the next attempt: the service's requested pause when the
/// error carries one, otherwise the policy's exponential schedule.
fn next_delay<E: Transient>(policy: &RetryPolicy, attempt: u32, error: &E) -> Duration {
    error
        .retry_after()
        .unwrap_or_else(|| policy.base_delay * 2u32.pow(attempt - 1))
}

/// Run `op`, retrying while the error is transient and attempts remain.
/// The final error is returned unchanged.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display + Transient,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts && e.is_transient() => {
                let delay = next_delay(policy, attempt, &e);
                warn!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "Retrying after failure");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
