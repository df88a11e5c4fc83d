use crate::models::error::AppError;
use gloo_timers::future::TimeoutFuture;
use std::future::Future;
use tracing::warn;

/// Retries an async operation with exponential backoff while the server
/// answers 429 Too Many Requests.
///
/// - Initial delay: 100ms
/// - Backoff multiplier: 5x (100ms → 500ms → 2500ms → ...)
/// - Any other error propagates immediately
pub async fn retry_with_backoff<F, Fut, T>(
    mut operation: F,
    max_attempts: u32,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut delay_ms = 100;
    let mut attempt = 1;

    loop {
        match operation().await {
            Err(e) if e.is_rate_limited() && attempt < max_attempts => {
                warn!(delay_ms, attempt, max_attempts, "rate limited, retrying");
                TimeoutFuture::new(delay_ms).await;
                delay_ms *= 5;
                attempt += 1;
            }
            result => return result,
        }
    }
}
