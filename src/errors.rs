//! Standardized error types following the `error-clientauth-<domain>-<number>` format.

use http::StatusCode;
use thiserror::Error;

use crate::oauth::types::OAuthErrorResponse;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when version information is not available
    #[error("error-clientauth-config-1 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when duration string cannot be parsed
    #[error("error-clientauth-config-2 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when boolean string cannot be parsed
    #[error(
        "error-clientauth-config-3 Failed to parse boolean '{0}': expected true/false/1/0/yes/no/on/off"
    )]
    BoolParsingFailed(String),

    /// Error when the registered clients file cannot be read
    #[error("error-clientauth-config-4 Unable to read registered clients file '{0}': {1}")]
    ClientsFileUnreadable(String, String),

    /// Error when the registered clients file is not valid JSON
    #[error("error-clientauth-config-5 Invalid registered clients file '{0}': {1}")]
    ClientsFileInvalid(String, String),

    /// Error when a configured redirect URI is not acceptable
    #[error("error-clientauth-config-6 Invalid redirect URI '{0}' for client '{1}': {2}")]
    InvalidRedirectUri(String, String, String),
}

/// OAuth client authentication errors
///
/// `InvalidClient` intentionally carries no detail. Every rejected credential
/// produces the same value, so callers cannot tell which check failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OAuthError {
    /// Client authentication failed
    #[error("error-clientauth-oauth-1 Client authentication failed")]
    InvalidClient,

    /// The request is missing a parameter or is otherwise malformed
    #[error("error-clientauth-oauth-2 Invalid request: {0}")]
    InvalidRequest(String),

    /// The server hit a condition it was not configured to handle
    #[error("error-clientauth-oauth-3 Server error: {0}")]
    ServerError(String),
}

impl OAuthError {
    /// RFC 6749 section 5.2 error code
    pub fn error_code(&self) -> &'static str {
        match self {
            OAuthError::InvalidClient => "invalid_client",
            OAuthError::InvalidRequest(_) => "invalid_request",
            OAuthError::ServerError(_) => "server_error",
        }
    }

    /// HTTP status a token endpoint should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            OAuthError::InvalidClient => StatusCode::UNAUTHORIZED,
            OAuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OAuthError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the externally visible error body.
    ///
    /// Server error details stay in the logs.
    pub fn to_error_response(&self) -> OAuthErrorResponse {
        let error_description = match self {
            OAuthError::InvalidClient => Some("Client authentication failed".to_string()),
            OAuthError::InvalidRequest(reason) => Some(reason.clone()),
            OAuthError::ServerError(_) => None,
        };

        OAuthErrorResponse {
            error: self.error_code().to_string(),
            error_description,
            error_uri: None,
        }
    }
}

/// Registered client storage errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Error when a lookup key or construction argument is missing or empty
    #[error("error-clientauth-storage-1 Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error when two registered clients share an identifier
    #[error("error-clientauth-storage-2 Registered client must be unique: {0}")]
    DuplicateClient(String),

    /// Error when query execution fails
    #[error("error-clientauth-storage-3 Query execution failed: {0}")]
    QueryFailed(String),
}

/// Client credentials token construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Error when a required token part is missing
    #[error("error-clientauth-token-1 Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<StorageError> for OAuthError {
    fn from(err: StorageError) -> Self {
        OAuthError::ServerError(err.to_string())
    }
}
