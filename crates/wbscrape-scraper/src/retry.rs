//! Fixed-delay retry for catalog requests.
//!
//! Transport failures and non-200 statuses are retried after a constant
//! pause; anything else (a malformed body, a bad URL) is returned at once.
//! There is no backoff growth and no jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` should be retried after the fixed delay.
///
/// Retriable errors:
/// - [`ScraperError::Http`]: connection failure, timeout, TLS error.
/// - [`ScraperError::UnexpectedStatus`]: any non-200 status. 4xx and 5xx are
///   treated alike.
///
/// Everything else is returned immediately.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Http(_) | ScraperError::UnexpectedStatus { .. }
    )
}

/// Runs `operation` up to `max_attempts` times, sleeping `delay` between
/// attempts.
///
/// Returns the first success, the first non-retriable error, or the error of
/// the final attempt once the bound is reached. A `max_attempts` of `0` is
/// treated as `1`. No sleep happens after the final attempt.
///
/// The sleep is `tokio::time::sleep`, so a long retry sequence yields to the
/// runtime instead of blocking other tasks.
pub(crate) async fn retry_with_delay<T, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "catalog request failed, retrying after delay"
                );
            }
        }

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
