//! Utility modules supporting export operations.
//!
//! - [`RetryPolicy`]: bounded retry with linear-in-attempt backoff
//! - [`with_retry`] / [`with_retry_detailed`]: run an operation with
//!   automatic retry on transient errors
//! - [`TransientError`]: classification of retryable failures
//! - [`HttpClient`]: shared reqwest client with sensible defaults
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use contact_audit::utils::{with_retry, RetryPolicy};
//! use contact_audit::api::ApiError;
//!
//! # async fn fetch_data() -> Result<String, ApiError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), ApiError> {
//! let policy = RetryPolicy::default();
//! let result = with_retry(policy, || async { fetch_data().await }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{with_retry, with_retry_detailed, RetryOutcome, RetryPolicy, TransientError};
