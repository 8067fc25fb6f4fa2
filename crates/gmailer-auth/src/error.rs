//! Error types for the auth module

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors that can occur while obtaining an access token
#[derive(Debug, Error)]
pub enum AuthError {
    /// Not enough credentials to produce an access token
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Token has expired and cannot be refreshed
    #[error("Token has expired")]
    TokenExpired,

    /// Refresh request was rejected or could not be sent
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
