use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    pub fn from_status(status: u16, status_text: &str) -> Self {
        ApiError::Status {
            status,
            status_text: status_text.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx responses: the request itself is wrong, retrying cannot help.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    /// Network failures and non-4xx statuses may succeed on another attempt.
    /// Anything else (unparseable body, unbuildable request) is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { .. } => !self.is_client_error(),
            ApiError::InvalidResponse(_) | ApiError::Request(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = ApiError::from_status(503, "Service Unavailable");
        assert_eq!(err.to_string(), "HTTP error! status: 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_classification() {
        assert!(ApiError::from_status(400, "Bad Request").is_client_error());
        assert!(ApiError::from_status(499, "").is_client_error());
        assert!(!ApiError::from_status(404, "Not Found").is_retryable());
        assert!(!ApiError::from_status(429, "Too Many Requests").is_retryable());

        assert!(ApiError::from_status(500, "").is_retryable());
        assert!(ApiError::from_status(503, "").is_retryable());
        assert!(ApiError::from_status(302, "Found").is_retryable());
        assert!(ApiError::Network("connection refused".into()).is_retryable());

        assert!(!ApiError::InvalidResponse("eof".into()).is_retryable());
        assert!(!ApiError::Request("bad url".into()).is_retryable());
        assert!(!ApiError::Network("x".into()).is_client_error());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");
        let long = "é".repeat(400);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("(truncated, 800 total bytes)"));
    }
}
