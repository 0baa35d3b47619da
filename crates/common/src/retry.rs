use crate::cancel::CancelToken;
use crate::config::RetrySettings;
use bvbrc_error::{ApiError, ErrorCode, ErrorContext, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Delay before retry number `attempt` (1-based): `base_ms * 2^(attempt-1)`, capped at `max_ms`.
pub fn next_retry_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let multiplier = 2_u64.saturating_pow(attempt.saturating_sub(1));
    let delay = base_ms.saturating_mul(multiplier);
    Duration::from_millis(delay.min(max_ms))
}

/// Execute an async operation with bounded retries.
///
/// The operation runs at most `max_retries + 1` times. Only errors whose code is
/// retryable consume budget; anything else is returned as-is. The cancel token is
/// checked before every attempt and raced against every attempt and backoff wait.
pub async fn retry_with_policy<T, F, Fut>(
    operation_name: &str,
    settings: RetrySettings,
    cancel: &CancelToken,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let total_attempts = settings.max_retries.saturating_add(1);
    let mut last_err: Option<ApiError> = None;

    for attempt in 0..total_attempts {
        if attempt > 0 {
            let delay = next_retry_delay(attempt, settings.base_delay_ms, settings.max_delay_ms);
            warn!(
                "Operation '{}' failed. Retrying in {:?} (Attempt {}/{}): {}",
                operation_name,
                delay,
                attempt,
                settings.max_retries,
                last_err.as_ref().map(|e| e.to_string()).unwrap_or_default()
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::cancelled()),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if cancel.is_cancelled() {
            return Err(ApiError::cancelled());
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::cancelled()),
            outcome = operation() => outcome,
        };

        match outcome {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }

    let last = last_err.unwrap_or_else(|| {
        ApiError::new(ErrorCode::Unknown, format!("'{}' made no attempts", operation_name))
    });
    error!(
        "Failed to execute '{}' after {} attempts: {}",
        operation_name, total_attempts, last
    );
    let last_error = last.message.clone();
    Err(last
        .with_context(ErrorContext::Retry {
            attempts: total_attempts,
            last_error,
        })
        .with_hint("The data service may be temporarily unavailable; try again later"))
}
