//! Cumulus API error types

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors produced while executing requests against the Cumulus API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The invoker could not complete the call (network failure, exhausted retries)
    #[error("{message}")]
    Transport { status: Option<u16>, message: String },

    /// The response body was not valid JSON
    #[error("Failed to parse response JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The response body encodes an API-level failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A listing response did not contain a `results` array
    #[error("{0}")]
    Pagination(String),

    #[error("A stack prefix is required")]
    MissingPrefix,

    /// A document lacks a field needed to build its resource path
    #[error("{kind} document is missing required field '{field}'")]
    MissingKey { kind: &'static str, field: &'static str },

    #[error("Invalid JSON document: {0}")]
    InvalidDocument(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status associated with this failure, when one is known
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => *status,
            ApiError::Decode { status, .. } => Some(*status),
            ApiError::Domain(err) => err.status,
            _ => None,
        }
    }

    /// A 404 reported by the API or the transport. Undecodable bodies never count.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::Domain(err) => err.status == Some(404),
            ApiError::Transport { status, .. } => *status == Some(404),
            _ => false,
        }
    }
}

/// Failure envelope returned by the API: `{ "error": ..., "message": ..., ... }`
#[derive(Debug, Clone)]
pub struct DomainError {
    /// `statusCode` from the envelope, falling back to the transport status
    pub status: Option<u16>,
    pub error: String,
    pub message: String,
    /// The complete decoded envelope
    pub body: Value,
}

impl DomainError {
    /// Interpret a decoded body as a domain failure.
    ///
    /// Returns `None` unless both `error` and `message` are present and non-null.
    pub fn from_body(body: &Value, transport_status: u16) -> Option<Self> {
        let error = body.get("error").filter(|v| !v.is_null())?;
        let message = body.get("message").filter(|v| !v.is_null())?;

        let status = body
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(transport_status);

        Some(Self {
            status: Some(status),
            error: text_of(error),
            message: text_of(message),
            body: body.clone(),
        })
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DomainError {}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_and_message_make_a_domain_failure() {
        let body = json!({"error": "BadRequest", "message": "bad"});
        let err = DomainError::from_body(&body, 400).expect("domain failure");
        assert_eq!(err.error, "BadRequest");
        assert_eq!(err.message, "bad");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn null_or_missing_error_is_not_a_failure() {
        assert!(DomainError::from_body(&json!({"error": null, "message": "ok"}), 200).is_none());
        assert!(DomainError::from_body(&json!({"message": "ok"}), 200).is_none());
        assert!(DomainError::from_body(&json!({"error": "x"}), 200).is_none());
    }

    #[test]
    fn envelope_status_code_wins_over_transport_status() {
        let body = json!({"error": "Not Found", "message": "No record found", "statusCode": 404});
        let err = ApiError::from(DomainError::from_body(&body, 200).unwrap());
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No record found");
    }

    #[test]
    fn transport_error_keeps_message_verbatim() {
        let err = ApiError::Transport {
            status: Some(503),
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Service Unavailable");
        assert!(!err.is_not_found());
    }

    #[test]
    fn undecodable_404_is_not_not_found() {
        let source = serde_json::from_str::<Value>("<html>").unwrap_err();
        let err = ApiError::Decode { status: 404, source };
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_not_found());
    }
}
