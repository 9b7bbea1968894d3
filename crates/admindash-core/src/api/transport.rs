//! The network seam under `ResilientFetch`.
//!
//! `HttpTransport` performs exactly one HTTP exchange. It reports a response
//! for any status code and only fails when no response was obtained.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Transport backed by a pooled `reqwest::Client`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self { client })
    }

    fn reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .client
            .request(Self::reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::Request(e.to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => unreadable_body(status.as_u16(), &e.to_string())?,
        };

        debug!(
            method = request.method.as_str(),
            url = %request.url,
            status = status.as_u16(),
            "HTTP exchange complete"
        );

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

/// A 2xx body that cannot be read is a network failure. For any other
/// status the body is only diagnostic, so the status decides.
fn unreadable_body(status: u16, error: &str) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        return Err(ApiError::Network(format!(
            "failed to read response body: {}",
            error
        )));
    }
    debug!(status, error, "Ignoring unreadable error body");
    Ok(String::new())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            method: Method::Post,
            url: "http://localhost/users".into(),
            headers: vec![("content-type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn test_unreadable_body_keeps_status_classification() {
        let err = unreadable_body(200, "connection reset").unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));

        assert_eq!(unreadable_body(404, "connection reset").unwrap(), "");
        assert_eq!(unreadable_body(503, "connection reset").unwrap(), "");
    }

    #[test]
    fn test_success_range() {
        let mut response = HttpResponse {
            status: 200,
            status_text: "OK".into(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 301;
        assert!(!response.is_success());
        response.status = 199;
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_reqwest_transport_reports_connection_failure_as_network_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let request = HttpRequest {
            method: Method::Get,
            // Port 9 (discard) on loopback is closed on any sane test host
            url: "http://127.0.0.1:9/users".into(),
            headers: vec![],
            body: None,
        };
        let err = transport.send(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
        assert!(err.is_retryable());
    }
}
