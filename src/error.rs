//! Error types for the Coinbase client library.

use thiserror::Error;

use crate::session::SessionState;

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

    /// Coinbase API returned an error status
    #[error("Coinbase API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing or empty API credentials
    #[error("Missing credentials: a non-empty API key and secret are required")]
    MissingCredentials,

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied parameter was rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// A wallet-dependent operation was invoked before the session was ready
    #[error("Account session is not ready (state: {0})")]
    NotReady(SessionState),

    /// The account session could not reach the ready state
    #[error("Account session failed: {0}")]
    SessionFailed(String),

    /// The session has already been initialized once
    #[error("Account session was already initialized (state: {0})")]
    AlreadyInitialized(SessionState),

    /// A notification signature could not be decoded
    #[error("Malformed notification signature: {0}")]
    MalformedSignature(String),

    /// A notification signature did not verify against the payload
    #[error("Notification signature did not verify")]
    UntrustedNotification,
}

/// A single error entry from Coinbase's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ApiErrorEntry {
    /// Machine-readable identifier (e.g., "not_found", "validation_error")
    pub id: String,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
}

/// An error response from the Coinbase API.
///
/// Carries the request method and path along with the HTTP status so the
/// failure can be diagnosed without the original request at hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP method of the failed request
    pub method: String,
    /// Request path (including query) of the failed request
    pub path: String,
    /// HTTP status code returned
    pub status: u16,
    /// Error entries parsed from the response body
    pub errors: Vec<ApiErrorEntry>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} returned {}", self.method, self.path, self.status)?;
        if let Some(first) = self.errors.first() {
            write!(f, ": {}: {}", first.id, first.message)?;
        }
        Ok(())
    }
}

impl ApiError {
    /// Create a new API error.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        errors: Vec<ApiErrorEntry>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            status,
            errors,
        }
    }

    /// The identifier of the first error entry, if any.
    pub fn first_id(&self) -> Option<&str> {
        self.errors.first().map(|e| e.id.as_str())
    }

    /// Check if any entry carries the given identifier.
    pub fn has_id(&self, id: &str) -> bool {
        self.errors.iter().any(|e| e.id == id)
    }

    /// Check if this is an authentication error.
    pub fn is_authentication_error(&self) -> bool {
        self.status == 401
            || self.has_id(error_ids::AUTHENTICATION_ERROR)
            || self.has_id(error_ids::INVALID_TOKEN)
            || self.has_id(error_ids::EXPIRED_TOKEN)
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.status == 429 || self.has_id(error_ids::RATE_LIMIT_EXCEEDED)
    }

    /// Check if the requested resource was not found.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.has_id(error_ids::NOT_FOUND)
    }

    /// Check if the request was rejected as invalid.
    pub fn is_validation_error(&self) -> bool {
        self.has_id(error_ids::VALIDATION_ERROR) || self.has_id(error_ids::PARAM_REQUIRED)
    }
}

/// Known Coinbase error identifiers.
pub mod error_ids {
    pub const PARAM_REQUIRED: &str = "param_required";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const PERSONAL_DETAILS_REQUIRED: &str = "personal_details_required";
    pub const TWO_FACTOR_REQUIRED: &str = "two_factor_required";
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const REVOKED_TOKEN: &str = "revoked_token";
    pub const EXPIRED_TOKEN: &str = "expired_token";
    pub const INVALID_SCOPE: &str = "invalid_scope";
    pub const NOT_FOUND: &str = "not_found";
    pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";
    pub const INTERNAL_SERVER_ERROR: &str = "internal_server_error";
}
