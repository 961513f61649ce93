//! reqwest-backed contacts API client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::api::{ApiError, ContactsApi};
use crate::models::{Contact, ContactsPage, PageRequest};
use crate::utils::HttpClient;

/// Header carrying the API credential, as the remote expects it.
const TOKEN_HEADER: &str = "api-token";

/// Client for the CRM contacts endpoint
#[derive(Debug, Clone)]
pub struct ContactsClient {
    http: HttpClient,
    base_url: Url,
    token: String,
}

impl ContactsClient {
    /// Create a client with the default HTTP settings
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_http(base_url, token, HttpClient::new())
    }

    /// Create a client around an existing [`HttpClient`]
    pub fn with_http(
        base_url: &str,
        token: impl Into<String>,
        http: HttpClient,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL: {}", e)))?;
        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    fn contacts_url(&self) -> Result<Url, ApiError> {
        self.base_url
            .join("contacts")
            .map_err(|e| ApiError::InvalidRequest(format!("invalid contacts URL: {}", e)))
    }
}

#[async_trait]
impl ContactsApi for ContactsClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ContactsPage, ApiError> {
        let mut query: Vec<(&str, String)> = vec![("limit", request.limit.to_string())];
        if let Some(offset) = request.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(page) = request.page {
            query.push(("page", page.to_string()));
        }

        let response = self
            .http
            .client()
            .get(self.contacts_url()?)
            .header(TOKEN_HEADER, &self.token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Auth(format!(
                "contacts API returned status: {}",
                status
            )));
        }
        if status == StatusCode::BAD_REQUEST {
            return Err(ApiError::InvalidRequest(format!(
                "contacts API returned status: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(ApiError::Api(format!(
                "contacts API returned status: {}",
                status
            )));
        }

        let envelope: ContactsEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse JSON: {}", e)))?;

        Ok(ContactsPage {
            records: envelope.data,
            total: envelope.total,
        })
    }
}

// ===== Contacts API wire types =====

#[derive(Debug, Deserialize)]
struct ContactsEnvelope {
    #[serde(default)]
    data: Vec<Contact>,
    #[serde(default)]
    total: Option<u64>,
}
