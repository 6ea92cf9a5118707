//! Bounded exponential-backoff retry for transient provider failures.
//!
//! Every agent call is wrapped in [`retry_transient`]. Only errors whose
//! [`TransientError::is_transient`] returns true are retried; permanent
//! errors and exhausted budgets propagate the original error unchanged.

use reelsmith_error::TransientError;
use std::future::Future;
use tokio_retry2::{strategy::ExponentialBackoff, Retry, RetryError};
use tracing::warn;

/// Initial backoff before the first retry, in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 5000;

/// Maximum number of retries after the initial attempt.
pub const MAX_RETRIES: usize = 3;

/// Execute `op`, retrying transient failures with doubling backoff.
///
/// Waits 5000 ms, then 10000 ms, then 20000 ms between attempts. Success
/// results pass through unchanged.
///
/// # Errors
///
/// Returns the underlying error when it is permanent or when the retry
/// budget is exhausted.
///
/// # Examples
///
/// ```no_run
/// use reelsmith_models::retry_transient;
/// use reelsmith_error::GeminiError;
///
/// # async fn example() -> Result<(), GeminiError> {
/// let value = retry_transient(|| async {
///     Ok::<_, GeminiError>(42)
/// })
/// .await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn retry_transient<T, E, F, Fut>(mut op: F) -> Result<T, E>
where
    E: TransientError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    // base 2 with factor 2500 yields the 5s/10s/20s doubling schedule
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(INITIAL_BACKOFF_MS / 2)
        .take(MAX_RETRIES);

    Retry::spawn(strategy, || {
        let fut = op();
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                Err(e) => {
                    if e.is_transient() {
                        warn!(error = %e, "Transient provider error, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    } else {
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        }
    })
    .await
}
