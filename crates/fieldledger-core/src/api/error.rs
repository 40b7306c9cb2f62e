//! Error taxonomy for backend calls.

use std::fmt;

use serde_json::Value;

/// Error from the API client or the session layer above it.
#[derive(Debug)]
pub enum ClientError {
    /// Required input or session state is missing or malformed. Raised
    /// before any network call, or when a 2xx body fails its schema.
    Validation(String),
    /// A sign-in response omitted one of the three auth headers.
    AuthHeaderMissing(&'static str),
    /// Transport-level failure: no HTTP status was obtained, or the
    /// response body could not be read.
    Network(reqwest::Error),
    /// Non-2xx HTTP response from the backend.
    Api {
        status: u16,
        /// One-line summary suitable for display
        message: String,
        /// Raw response body, kept for logging
        body: Option<String>,
    },
}

impl ClientError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Creates an API error from a status code and raw body.
    ///
    /// Pulls a human-readable message out of the common backend error
    /// shapes (`errors` as a string array, `errors.full_messages`,
    /// `error`, `message`) and falls back to `HTTP <status>`.
    pub fn api(status: u16, body: &str) -> Self {
        let message = match extract_message(body) {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };
        ClientError::Api {
            status,
            message,
            body: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// HTTP status for API errors, None for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 response, which means the session is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Best-effort extraction of a display message from an error body.
fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    if let Some(errors) = json.get("errors") {
        if let Some(first) = errors.as_array().and_then(|a| a.first()).and_then(Value::as_str) {
            return Some(first.to_string());
        }
        if let Some(first) = errors
            .get("full_messages")
            .and_then(Value::as_array)
            .and_then(|a| a.first())
            .and_then(Value::as_str)
        {
            return Some(first.to_string());
        }
    }

    if let Some(msg) = json.get("error").and_then(Value::as_str) {
        return Some(msg.to_string());
    }

    json.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Validation(message) => write!(f, "{message}"),
            ClientError::AuthHeaderMissing(name) => {
                write!(f, "sign-in response missing auth header '{name}'")
            }
            ClientError::Network(err) => write!(f, "network error: {err}"),
            ClientError::Api { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err)
    }
}

/// Result type for API client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
