//! JSON requests with bounded retries.
//!
//! `ResilientFetch` runs up to `max_retries + 1` sequential attempts per
//! request. Client errors (4xx) stop the loop at once. Network failures and
//! other non-2xx statuses are retried after a linear backoff of
//! `retry_delay * (attempt + 1)`. Any other failure, such as a 2xx body that
//! is not valid JSON, is returned without retrying.
//!
//! Every retry bumps the retry counter on the shared `AppStore`, and any
//! success resets it. The counter is shared by all requests using that
//! store, so with overlapping requests it cannot be attributed to one of
//! them. The final error of a failed request is also published as the
//! store's last error.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::transport::{HttpRequest, HttpTransport, Method};
use super::ApiError;
use crate::config::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
use crate::state::AppStore;

/// A JSON request plus its retry policy.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl FetchRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn post<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::new(Method::Post, url).with_json(body)
    }

    pub fn put<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::new(Method::Put, url).with_json(body)
    }

    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Request(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Backoff before the attempt following `attempt` (0-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_delay * (attempt + 1)
    }

    fn to_http(&self) -> HttpRequest {
        let mut headers = self.headers.clone();
        let body = self.body.as_ref().map(|value| value.to_string());

        let has_content_type = headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        if body.is_some() && !has_content_type {
            headers.insert(0, ("Content-Type".to_string(), "application/json".to_string()));
        }

        HttpRequest {
            method: self.method,
            url: self.url.clone(),
            headers,
            body,
        }
    }
}

/// Retrying JSON client. Clone is cheap; clones share transport and store.
#[derive(Clone)]
pub struct ResilientFetch {
    transport: Arc<dyn HttpTransport>,
    store: AppStore,
}

impl ResilientFetch {
    pub fn new(transport: Arc<dyn HttpTransport>, store: AppStore) -> Self {
        Self { transport, store }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Run `request`, retrying transient failures, and parse the JSON body.
    pub async fn request<T: DeserializeOwned>(&self, request: FetchRequest) -> Result<T, ApiError> {
        let http_request = request.to_http();
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..=request.max_retries {
            let error = match self.attempt(&http_request).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(url = %request.url, attempt = attempt, "Request succeeded after retry");
                    }
                    self.store.reset_retry();
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !error.is_retryable() {
                debug!(url = %request.url, error = %error, "Terminal error, not retrying");
                last_error = Some(error);
                break;
            }

            if attempt < request.max_retries {
                self.store.increment_retry();
                let delay = request.backoff_for(attempt);
                warn!(
                    url = %request.url,
                    attempt = attempt + 1,
                    max_retries = request.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            last_error = Some(error);
        }

        let error = last_error
            .unwrap_or_else(|| ApiError::Network("Network request failed".to_string()));
        warn!(url = %request.url, error = %error, "Request failed");
        self.store.set_error(Some(error.to_string()));
        Err(error)
    }

    async fn attempt<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, ApiError> {
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.status_text));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "{} (body: {})",
                e,
                ApiError::truncate_body(&response.body)
            ))
        })
    }

    // ===== Convenience wrappers =====

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.request(FetchRequest::get(url)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.prepared(FetchRequest::post(url, body))?;
        self.request(request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.prepared(FetchRequest::put(url, body))?;
        self.request(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.request(FetchRequest::delete(url)).await
    }

    /// Mirror request-building failures into the store like any other failure
    fn prepared(&self, request: Result<FetchRequest, ApiError>) -> Result<FetchRequest, ApiError> {
        request.map_err(|e| {
            self.store.set_error(Some(e.to_string()));
            e
        })
    }
}
