//! Error types for the document analyzer backend.

/// Result type alias using [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the analyzer backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error text extracted from the response body.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Reading a local file for upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected locally before any request was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl ApiError {
    /// Create a server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        ApiError::Decode(msg.into())
    }

    /// Create a local validation error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidRequest(msg.into())
    }

    /// Get the HTTP status code if the server rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } if !message.is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    /// Whether the failure happened before reaching the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The backend answers failures with `{"error": ...}` and sometimes adds a
/// `message`; anything else is passed through as raw text.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.trim().to_string()
}
