use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::api::error::FALLBACK_MESSAGE;
use crate::api::ApiError;

/// The `{ code, message }` head every backend response carries.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeHead {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl EnvelopeHead {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Check the envelope `code` and decode the endpoint payload from the same body.
///
/// A non-2xx `code` becomes [`ApiError::Rejected`] carrying the backend's
/// message. Payload keys sit next to `code` and `message`, so `T` is decoded
/// from the whole body.
pub fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let head: EnvelopeHead = serde_json::from_value(value.clone())
        .map_err(|e| ApiError::InvalidResponse(format!("missing envelope: {}", e)))?;

    if !head.is_success() {
        return Err(ApiError::Rejected {
            code: head.code,
            message: head
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Payload of endpoints that only acknowledge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
