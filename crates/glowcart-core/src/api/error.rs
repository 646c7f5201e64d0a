use serde_json::Value;
use thiserror::Error;

/// Message used when the client gave up waiting for a response.
pub const TIMEOUT_MESSAGE: &str = "Request timeout";

/// Message used when no response reached the client at all.
pub const NETWORK_MESSAGE: &str = "Network error";

/// Fallback message when the backend did not explain the failure.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Normalized failure surfaced to every caller of the API client.
///
/// Callers only need `message()`; the variant tells the retry loop and the
/// endpoint layer how the failure happened. `Clone` because a deduplicated
/// request hands the same error to every waiting caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Timeout { message: String },

    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Client { status: u16, message: String },

    /// The HTTP call succeeded but the envelope `code` reported a failure.
    #[error("{message}")]
    Rejected { code: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull a `message` string out of a JSON error body, if there is one.
    fn body_message(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::body_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        match status.as_u16() {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            code @ 500..=599 => ApiError::Server { status: code, message },
            code => ApiError::Client { status: code, message },
        }
    }

    /// Normalize a transport failure where no usable response arrived.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                message: TIMEOUT_MESSAGE.to_string(),
            }
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Network {
                message: NETWORK_MESSAGE.to_string(),
            }
        }
    }

    /// Human-readable message for display.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status behind this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::Server { status, .. } | ApiError::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Network failures, client-side timeouts and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout { .. } | ApiError::Network { .. } | ApiError::Server { .. }
        )
    }
}
