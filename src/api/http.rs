//! HTTP event sink
//!
//! Posts each event to `{base_url}/update_jobs/{job_id}/{endpoint}` as
//! `{"data": <payload>}` with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use super::{ApiHandler, ApiMessage};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("depjob/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// Sends events to the PR-management service over HTTP
#[derive(Clone)]
pub struct HttpApiHandler {
    client: Client,
    base_url: String,
    job_id: String,
    token: Option<String>,
    max_retries: u32,
}

impl HttpApiHandler {
    /// Create a handler with default settings
    pub fn new(base_url: impl Into<String>, job_id: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_config(base_url, job_id, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a handler with custom timeout and User-Agent
    pub fn with_config(
        base_url: impl Into<String>,
        job_id: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ApiError::network_error("client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            job_id: job_id.into(),
            token: None,
            max_retries: MAX_RETRIES,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Full URL for an endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/update_jobs/{}/{}", self.base_url, self.job_id, endpoint)
    }

    async fn post_with_retry(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<(), ApiError> {
        let url = self.endpoint_url(endpoint);
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            let mut request = self.client.post(&url).json(body);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_error = Some(if status == StatusCode::TOO_MANY_REQUESTS {
                            ApiError::RateLimitExceeded {
                                endpoint: endpoint.to_string(),
                            }
                        } else {
                            ApiError::Rejected {
                                endpoint: endpoint.to_string(),
                                status: status.as_u16(),
                            }
                        });
                    } else if !status.is_success() {
                        return Err(ApiError::Rejected {
                            endpoint: endpoint.to_string(),
                            status: status.as_u16(),
                        });
                    } else {
                        debug!("sent {} event", endpoint);
                        return Ok(());
                    }
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        ApiError::timeout(endpoint)
                    } else {
                        ApiError::network_error(endpoint, e.to_string())
                    });
                }
            }

            if attempt < self.max_retries {
                warn!(
                    "sending {} event failed (attempt {}), retrying in {}ms",
                    endpoint,
                    attempt + 1,
                    delay
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::network_error(endpoint, "unknown error")))
    }
}

#[async_trait]
impl ApiHandler for HttpApiHandler {
    async fn send(&self, message: ApiMessage) -> Result<(), ApiError> {
        let endpoint = message.endpoint();
        let payload = message.payload().map_err(|e| ApiError::Serialization {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        let body = serde_json::json!({ "data": payload });
        self.post_with_retry(endpoint, &body).await
    }
}
