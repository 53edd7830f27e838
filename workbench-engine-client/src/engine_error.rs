use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures talking to the anonymization engine. The `Display` text of every
/// variant is meant to be shown to the user as is.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request never got an HTTP answer (connect, DNS, timeout, reset).
    #[error("Cannot reach the processing engine at {base_url}. Check that the backend is running.")]
    Unreachable {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The engine answered with an error status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("An unexpected error occurred: {message}")]
    Unexpected { message: String },
}

impl EngineError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        EngineError::Unexpected {
            message: message.into(),
        }
    }

    /// Builds the rejection from an error response body.
    ///
    /// Uses the engine's `detail` (or `message`) field when present, the
    /// operation fallback when the body is JSON without either, and a
    /// status-derived message when the body is not JSON at all.
    pub fn rejected(status: StatusCode, body: &str, fallback: &str) -> Self {
        let message = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => ["detail", "message"]
                .iter()
                .find_map(|key| match fields.get(*key) {
                    Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
                    Some(Value::Null) | None => None,
                    Some(Value::String(_)) => None,
                    Some(other) => Some(other.to_string()),
                })
                .unwrap_or_else(|| fallback.to_string()),
            Ok(_) => fallback.to_string(),
            Err(_) => format!("Server error ({status})"),
        };

        EngineError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, EngineError::Unreachable { .. })
    }
}
