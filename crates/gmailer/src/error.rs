//! Error types for sending operations

use gmailer_auth::AuthError;
use thiserror::Error;

/// Result type for sending operations
pub type MailResult<T> = Result<T, MailError>;

/// Errors that can occur while preparing or sending a message
#[derive(Debug, Error)]
pub enum MailError {
    /// Neither body text nor a template was given
    #[error("Email body text or an HTML template is required")]
    MissingBody,

    /// Both body text and a template were given
    #[error("Email body text and an HTML template cannot both be given")]
    ConflictingBody,

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Message building error
    #[error("Failed to build message: {0}")]
    MessageBuildError(String),

    /// Required configuration value is not set
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    /// Configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Connection failed
    #[error("Failed to connect to SMTP server: {0}")]
    ConnectionFailed(String),

    /// Failed to send message
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    /// Gmail API rejected the request
    #[error("Gmail API error {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Gmail API answered with something unreadable
    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    /// Could not obtain an access token
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
}
