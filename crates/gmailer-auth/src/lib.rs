//! Authentication module for gmailer
//!
//! Turns stored Gmail OAuth2 credentials into a usable access token.
//! The token exchange itself is delegated to the `oauth2` crate.

mod error;
mod oauth2;
mod token;

pub use error::{AuthError, AuthResult};
pub use oauth2::{OAuth2Client, OAuth2Config, TokenPair};
pub use token::{
    GmailCredentials, TokenManager, ACCESS_TOKEN_ENV, CLIENT_ID_ENV, CLIENT_SECRET_ENV,
    REFRESH_TOKEN_ENV,
};

/// Gmail OAuth2 configuration
pub mod gmail {
    use super::OAuth2Config;

    /// Scope that only allows sending mail
    pub const SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

    pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

    /// Create the OAuth2 configuration used to refresh Gmail send tokens
    pub fn send_config(client_id: &str, client_secret: &str) -> OAuth2Config {
        OAuth2Config {
            client_id: client_id.to_string(),
            client_secret: Some(client_secret.to_string()),
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            scopes: vec![SEND_SCOPE.to_string()],
        }
    }
}
