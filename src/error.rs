//! Error types for the OctoPrint client.
//!
//! Every fallible operation in this crate returns [`Result`]. HTTP responses
//! outside the 2xx range are mapped onto [`OctoPrintError`] variants through
//! [`OctoPrintError::from_status`], so callers can match on the kind of
//! failure instead of inspecting raw status codes.
//!
//! | Status | Variant |
//! |--------|---------|
//! | 400 | [`OctoPrintError::BadRequest`] |
//! | 401 | [`OctoPrintError::Unauthorized`] |
//! | 403 | [`OctoPrintError::Forbidden`] |
//! | 404 | [`OctoPrintError::NotFound`] |
//! | 405 | [`OctoPrintError::MethodNotAllowed`] |
//! | 409 | [`OctoPrintError::Conflict`] |
//! | 415 | [`OctoPrintError::UnsupportedMediaType`] |
//! | 5xx | [`OctoPrintError::Server`] |
//! | other | [`OctoPrintError::UnexpectedStatus`] |

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, OctoPrintError>;

/// Errors returned by the OctoPrint client.
#[derive(Debug, Error)]
pub enum OctoPrintError {
    /// The request was malformed or carried invalid parameters (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No valid API key or session was supplied (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The authenticated user lacks the required permission (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The addressed resource does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The endpoint does not support the HTTP method used (405).
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// The printer or resource is in a state that forbids the operation (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request body had the wrong content type (415).
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// OctoPrint failed internally (5xx).
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Any other non-success status.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Transport level failure (connection refused, timeout, TLS, ...).
    #[error("http error: {0}")]
    Http(String),

    /// The configured base URL or a derived endpoint URL is invalid.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A response body did not match the expected shape.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The client configuration is incomplete or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A listing entry lacks the link needed for the operation, such as a
    /// download link for a file stored on the SD card.
    #[error("missing link: {0}")]
    MissingLink(String),

    /// Reading a local file (for uploads) failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The push channel received something that is not valid SockJS.
    #[error("push protocol error: {0}")]
    Push(String),

    /// The server closed the push session.
    #[error("push session closed: {code} {reason}")]
    PushClosed {
        /// SockJS close code
        code: u16,
        /// Close reason sent by the server
        reason: String,
    },
}

impl OctoPrintError {
    /// Map a non-success HTTP status to an error variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => OctoPrintError::BadRequest(message),
            401 => OctoPrintError::Unauthorized(message),
            403 => OctoPrintError::Forbidden(message),
            404 => OctoPrintError::NotFound(message),
            405 => OctoPrintError::MethodNotAllowed(message),
            409 => OctoPrintError::Conflict(message),
            415 => OctoPrintError::UnsupportedMediaType(message),
            500..=599 => OctoPrintError::Server { status, message },
            _ => OctoPrintError::UnexpectedStatus { status, message },
        }
    }

    /// The HTTP status this error was derived from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            OctoPrintError::BadRequest(_) => Some(400),
            OctoPrintError::Unauthorized(_) => Some(401),
            OctoPrintError::Forbidden(_) => Some(403),
            OctoPrintError::NotFound(_) => Some(404),
            OctoPrintError::MethodNotAllowed(_) => Some(405),
            OctoPrintError::Conflict(_) => Some(409),
            OctoPrintError::UnsupportedMediaType(_) => Some(415),
            OctoPrintError::Server { status, .. } => Some(*status),
            OctoPrintError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            OctoPrintError::Http(_) => true,
            other => other
                .status()
                .map(crate::client::is_retryable_status)
                .unwrap_or(false),
        }
    }
}

impl From<reqwest::Error> for OctoPrintError {
    fn from(err: reqwest::Error) -> Self {
        OctoPrintError::Http(err.to_string())
    }
}
