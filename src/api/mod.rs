//! Remote contacts API binding.
//!
//! The exporter talks to the remote CRM through the [`ContactsApi`] trait so
//! the pagination and dedup logic can be exercised against a scripted mock.
//! The production implementation is [`ContactsClient`], a thin reqwest
//! wrapper around the `/contacts` endpoint.

mod client;
pub mod mock;

pub use client::ContactsClient;
pub use mock::MockApi;

use async_trait::async_trait;

use crate::models::{ContactsPage, PageRequest};

/// One-page fetch capability of the remote CRM
#[async_trait]
pub trait ContactsApi: Send + Sync + std::fmt::Debug {
    /// Fetch one page of contacts
    async fn fetch_page(&self, request: &PageRequest) -> Result<ContactsPage, ApiError>;
}

/// Errors that can occur when talking to the contacts API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request or connection timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection-level failure (refused, reset, name resolution)
    #[error("Network error: {0}")]
    Network(String),

    /// Credential rejected by the remote
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// Malformed request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Application-level error reported by the remote
    #[error("API error: {0}")]
    Api(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            // Connect failures, resets mid-body and anything else
            // transport-level all land here.
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(format!("JSON: {}", err))
    }
}
