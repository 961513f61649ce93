//! Retry utilities for resilient API calls.

use std::time::Duration;
use tokio::time::sleep;

use crate::api::ApiError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Base delay; the retry after failed attempt `n` waits `base_delay * n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Policy for the connectivity probe: a single attempt, no retry
    pub fn probe() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff to wait after failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Transient error classes that are eligible for retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientError {
    /// Request or connection timed out
    Timeout,
    /// Connection-level failure (refused, reset, name resolution)
    Network,
}

impl TransientError {
    /// Classify an API error; `None` means the error is permanent.
    ///
    /// Classification is structured on the [`ApiError`] variant. Only for
    /// opaque upstream `Api` messages does the timeout substring heuristic
    /// still apply.
    pub fn from_api_error(err: &ApiError) -> Option<Self> {
        match err {
            ApiError::Timeout(_) => Some(TransientError::Timeout),
            ApiError::Network(_) => Some(TransientError::Network),
            ApiError::Api(msg) if msg.to_lowercase().contains("timeout") => {
                Some(TransientError::Timeout)
            }
            _ => None,
        }
    }
}

/// Result of a retried operation, with attempt accounting
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// Operation succeeded on the given attempt
    Success(T, u32),
    /// Transient failures exhausted every attempt; the last error is attached
    TransientFailure(ApiError, TransientError, u32),
    /// Operation failed with a permanent error; no retry was made
    PermanentFailure(ApiError),
}

/// Execute an async operation with retry logic, reporting how it ended.
///
/// Transient errors are retried up to `policy.max_attempts` total attempts,
/// waiting `base_delay * attempt` between attempts. Permanent errors are
/// returned immediately. The error surfaced is always the last one the
/// operation produced, never a wrapper around it.
pub async fn with_retry_detailed<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "operation succeeded after transient failures");
                }
                return RetryOutcome::Success(value, attempt);
            }
            Err(error) => {
                let Some(class) = TransientError::from_api_error(&error) else {
                    return RetryOutcome::PermanentFailure(error);
                };

                if attempt >= policy.max_attempts {
                    tracing::warn!(attempt, %error, "attempts exhausted");
                    return RetryOutcome::TransientFailure(error, class, attempt);
                }

                let delay = policy.backoff(attempt);
                tracing::debug!(attempt, ?class, ?delay, "transient error, retrying");
                sleep(delay).await;
            }
        }
    }
}

/// Execute an async operation with retry logic.
///
/// Convenience wrapper over [`with_retry_detailed`] for callers that only
/// need the final result.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    match with_retry_detailed(policy, operation).await {
        RetryOutcome::Success(value, _) => Ok(value),
        RetryOutcome::TransientFailure(error, _, _) => Err(error),
        RetryOutcome::PermanentFailure(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tokio::time::Instant;

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_success_first_try_makes_one_attempt() {
        let call_count = Rc::new(RefCell::new(0));

        let result = {
            let call_count = call_count.clone();
            with_retry(quick_policy(3), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Ok("success")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures_waits_linearly() {
        let call_count = Rc::new(RefCell::new(0));
        let start = Instant::now();

        let result = {
            let call_count = call_count.clone();
            with_retry_detailed(quick_policy(4), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    let count = *call_count.borrow();
                    if count < 3 {
                        Err(ApiError::Timeout("connect timeout".to_string()))
                    } else {
                        Ok("success")
                    }
                }
            })
        }
        .await;

        // Success on attempt 3: exactly two waits of 10ms and 20ms.
        match result {
            RetryOutcome::Success(value, attempts) => {
                assert_eq!(value, "success");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(*call_count.borrow(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_last_error() {
        let call_count = Rc::new(RefCell::new(0));

        let result: RetryOutcome<()> = {
            let call_count = call_count.clone();
            with_retry_detailed(quick_policy(3), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    let count = *call_count.borrow();
                    Err(ApiError::Network(format!("reset on attempt {}", count)))
                }
            })
        }
        .await;

        match result {
            RetryOutcome::TransientFailure(error, class, attempts) => {
                assert_eq!(attempts, 3);
                assert_eq!(class, TransientError::Network);
                assert!(error.to_string().contains("attempt 3"));
            }
            other => panic!("expected transient failure, got {:?}", other),
        }
        assert_eq!(*call_count.borrow(), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_short_circuits() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<(), ApiError> = {
            let call_count = call_count.clone();
            with_retry(quick_policy(5), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(ApiError::Auth("token rejected".to_string()))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(ApiError::Auth(_))));
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_probe_policy_never_retries() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<(), ApiError> = {
            let call_count = call_count.clone();
            with_retry(RetryPolicy::probe(), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(ApiError::Timeout("timed out".to_string()))
                }
            })
        }
        .await;

        assert!(result.is_err());
        assert_eq!(*call_count.borrow(), 1);
    }

    #[test]
    fn test_transient_classification() {
        assert_eq!(
            TransientError::from_api_error(&ApiError::Timeout("t".into())),
            Some(TransientError::Timeout)
        );
        assert_eq!(
            TransientError::from_api_error(&ApiError::Network("dns failure".into())),
            Some(TransientError::Network)
        );
        // Opaque upstream message mentioning a timeout is still retryable.
        assert_eq!(
            TransientError::from_api_error(&ApiError::Api("gateway timeout".into())),
            Some(TransientError::Timeout)
        );
        assert_eq!(
            TransientError::from_api_error(&ApiError::Auth("rejected".into())),
            None
        );
        assert_eq!(
            TransientError::from_api_error(&ApiError::Parse("bad json".into())),
            None
        );
    }

    #[test]
    fn test_backoff_schedule_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(6));
    }
}
