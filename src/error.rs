//! Error types for the Coinbase client library.

use thiserror::Error;

/// The main error type for all Coinbase client operations.
#[derive(Error, Debug)]
pub enum CoinbaseError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-success HTTP status
    #[error("{0}")]
    Transport(TransportError),

    /// A path template placeholder had no matching argument
    #[error("Missing path argument: {0}")]
    MissingPathArgument(String),

    /// An authenticated endpoint was called on a client without auth configuration
    #[error("Missing auth configuration: an API key or OAuth tokens are required for this endpoint")]
    MissingAuthConfig,

    /// The configured auth strategy tag is not one of `api_key` or `oauth`
    #[error("Unrecognized auth strategy: {0}")]
    UnrecognizedAuthStrategy(String),

    /// A list endpoint answered without a `pagination` object
    #[error("Response is missing the pagination cursor")]
    MissingPagination,

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CoinbaseError {
    /// The HTTP status of a transport failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoinbaseError::Transport(err) => Some(err.status),
            _ => None,
        }
    }

    /// Check if this is a `401 Unauthorized` transport failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<TransportError> for CoinbaseError {
    fn from(err: TransportError) -> Self {
        CoinbaseError::Transport(err)
    }
}

/// A non-2xx HTTP result, carrying the errors reported in the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// HTTP status code
    pub status: u16,
    /// Errors from the `errors` array of the body, in server order.
    ///
    /// Empty when the body did not have the expected error shape.
    pub errors: Vec<ApiError>,
}

impl TransportError {
    /// Create a new transport error.
    pub fn new(status: u16, errors: Vec<ApiError>) -> Self {
        Self { status, errors }
    }

    /// The error messages reported by the server, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.errors.is_empty() {
            write!(f, ": {}", self.messages().join("; "))?;
        }
        Ok(())
    }
}

/// A single entry of the Coinbase error envelope.
///
/// ```json
/// {"errors": [{"id": "not_found", "message": "Not found", "url": "https://..."}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ApiError {
    /// Machine readable error id (e.g. `"expired_token"`)
    pub id: String,
    /// Human-readable error message
    pub message: String,
    /// Link to documentation for this error
    #[serde(default)]
    pub url: Option<String>,
}

impl ApiError {
    /// Create a new API error from id and message.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            url: None,
        }
    }

    /// Parse the `errors` array out of an error response body.
    ///
    /// Any body that does not match the envelope yields an empty list.
    pub fn from_body(body: &str) -> Vec<Self> {
        #[derive(serde::Deserialize)]
        struct Envelope {
            errors: Vec<ApiError>,
        }
        serde_json::from_str::<Envelope>(body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

/// Known Coinbase error ids for pattern matching.
pub mod error_ids {
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const EXPIRED_TOKEN: &str = "expired_token";
    pub const REVOKED_TOKEN: &str = "revoked_token";
    pub const INVALID_SCOPE: &str = "invalid_scope";
    pub const TWO_FACTOR_REQUIRED: &str = "two_factor_required";
    pub const PARAM_REQUIRED: &str = "param_required";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const PERSONAL_DETAILS_REQUIRED: &str = "personal_details_required";
    pub const NOT_FOUND: &str = "not_found";
    pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";
    pub const INTERNAL_SERVER_ERROR: &str = "internal_server_error";
}
