//! Error types for the EditionGuard client
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Failures fall
//! into three families that callers usually care about:
//!
//! - **Transport**: the request never produced an HTTP response (DNS, TLS,
//!   connection refused, timeout, truncated body).
//! - **Status**: the API answered with a non-2xx status. The status code, the
//!   endpoint and the raw response body are kept for diagnostics.
//! - **Decode**: the API answered 2xx but the body is not valid JSON.
//!
//! Nothing in this crate retries. The classification helpers below exist so
//! callers can decide that for themselves.

use thiserror::Error;

/// Result type alias using [`EditionGuardError`]
pub type Result<T> = std::result::Result<T, EditionGuardError>;

/// Main error type for the EditionGuard client
#[derive(Error, Debug)]
pub enum EditionGuardError {
    // ===== Transport Errors =====

    /// The HTTP exchange failed before a response was available
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // ===== API Errors =====

    /// API answered with a non-success status code
    #[error("API request to '{endpoint}' failed with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Endpoint path relative to the API base URL
        endpoint: String,
        /// Raw response body, possibly empty
        body: String,
    },

    /// API answered 2xx but the body could not be decoded as JSON
    #[error("Invalid API response: {message}")]
    Decode {
        message: String,
        /// Raw response body
        body: String,
        #[source]
        source: serde_json::Error,
    },

    // ===== Caller / Configuration Errors =====

    /// Caller supplied a value that cannot be put on the wire
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

// Helper methods for creating common errors
impl EditionGuardError {
    /// Create a Status error
    pub fn status_failed<S: Into<String>, B: Into<String>>(status: u16, endpoint: S, body: B) -> Self {
        EditionGuardError::Status {
            status,
            endpoint: endpoint.into(),
            body: body.into(),
        }
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        EditionGuardError::InvalidInput(message.into())
    }

    /// Create a Configuration error with a message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        EditionGuardError::Configuration(message.into())
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            EditionGuardError::Status { status, .. } => Some(*status),
            EditionGuardError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body carried by the error, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            EditionGuardError::Status { body, .. } | EditionGuardError::Decode { body, .. } => {
                Some(body.as_str())
            }
            _ => None,
        }
    }

    /// Underlying transport error, if any
    pub fn transport(&self) -> Option<&reqwest::Error> {
        match self {
            EditionGuardError::Transport(e) => Some(e),
            _ => None,
        }
    }

    /// Check if the request never got an HTTP response
    pub fn is_transport(&self) -> bool {
        matches!(self, EditionGuardError::Transport(_))
    }

    /// Check if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, EditionGuardError::Transport(e) if e.is_timeout())
    }

    /// Check if the API rejected the token (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Check if the requested resource does not exist (404)
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the API reported a server-side failure (5xx)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Check if the failure is worth retrying at the caller's discretion
    ///
    /// Returns `true` for transport timeouts and connection failures, 5xx
    /// responses and 429 rate limiting. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            EditionGuardError::Transport(e) => e.is_timeout() || e.is_connect(),
            EditionGuardError::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}
