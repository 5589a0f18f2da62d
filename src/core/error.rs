//! Error type system for the movie rater client
//!
//! This module provides the error taxonomy shared by every API layer:
//! - Transport failures (request never answered)
//! - HTTP status mapping for validation, auth, not-found and server errors
//! - Message extraction from the backend's JSON error bodies
//! - Local precondition and decoding failures

use reqwest::StatusCode;
use serde_json::Value;

/// Main error type for the movie rater client
#[derive(Debug, thiserror::Error)]
pub enum RaterError {
    // Transport errors
    #[error("Network error: {0}")]
    NetworkError(String),

    // Errors reported by the backend
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        /// Field-level detail as sent by the backend, e.g. `{"email": ["..."]}`
        details: Option<Value>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    // Local errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RaterError {
    /// Map a non-success response onto the error taxonomy.
    ///
    /// `body` is whatever JSON the backend sent (or `Value::Null` when the
    /// body was empty or not JSON).
    pub fn from_response(status: StatusCode, body: &Value) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        match status.as_u16() {
            401 | 403 => RaterError::Unauthorized(message),
            404 => RaterError::NotFound(message),
            400..=499 => RaterError::ValidationError {
                message,
                details: field_details(body),
            },
            _ => RaterError::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Build a validation error for a single missing or malformed field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        RaterError::ValidationError {
            details: Some(serde_json::json!({ field: [message.clone()] })),
            message: format!("{}: {}", field, message),
        }
    }

    /// Get the HTTP status code this error corresponds to, if any
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            RaterError::ValidationError { .. } => Some(StatusCode::BAD_REQUEST),
            RaterError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            RaterError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            RaterError::ServerError { status, .. } => StatusCode::from_u16(*status).ok(),
            RaterError::NetworkError(_)
            | RaterError::InvalidInput(_)
            | RaterError::DeserializationError(_)
            | RaterError::ConfigError(_)
            | RaterError::IoError(_) => None,
        }
    }

    /// Get the error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            RaterError::NetworkError(_) => "NetworkError",
            RaterError::ValidationError { .. } => "ValidationError",
            RaterError::Unauthorized(_) => "Unauthorized",
            RaterError::NotFound(_) => "NotFound",
            RaterError::ServerError { .. } => "ServerError",
            RaterError::InvalidInput(_) => "InvalidInput",
            RaterError::DeserializationError(_) => "DeserializationError",
            RaterError::ConfigError(_) => "ConfigError",
            RaterError::IoError(_) => "IoError",
        }
    }

    /// Text a view shows inline next to the failed action
    pub fn user_message(&self) -> String {
        match self {
            RaterError::NetworkError(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            RaterError::ValidationError { message, .. } => message.clone(),
            RaterError::Unauthorized(_) => "Please log in again to continue.".to_string(),
            RaterError::NotFound(_) => "The requested item could not be found.".to_string(),
            RaterError::ServerError { .. } => {
                "The server ran into a problem. Please try again later.".to_string()
            }
            RaterError::InvalidInput(message) => message.clone(),
            RaterError::DeserializationError(_) => {
                "The server sent a response we could not read.".to_string()
            }
            RaterError::ConfigError(_) | RaterError::IoError(_) => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for RaterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RaterError::DeserializationError(err.to_string())
        } else {
            RaterError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RaterError {
    fn from(err: serde_json::Error) -> Self {
        RaterError::DeserializationError(err.to_string())
    }
}

/// Result type alias for operations that can fail with RaterError
pub type Result<T> = std::result::Result<T, RaterError>;

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": ..}`, `{"message": ..}`, `{"error": ..}` and
/// field maps such as `{"email": ["already exists"]}`.
fn extract_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }

            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, value)| {
                    flatten_messages(value).map(|msg| format!("{}: {}", field, msg))
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

fn flatten_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join(" "))
            }
        }
        _ => None,
    }
}

fn field_details(body: &Value) -> Option<Value> {
    match body {
        Value::Object(map) if !map.contains_key("detail") && !map.is_empty() => Some(body.clone()),
        _ => None,
    }
}
