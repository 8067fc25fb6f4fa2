//! Access token lifecycle for the Gmail API

use crate::oauth2::{OAuth2Client, TokenPair};
use crate::{gmail, AuthError, AuthResult};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const ACCESS_TOKEN_ENV: &str = "GMAIL_OAUTH_ACCESS_TOKEN";
pub const REFRESH_TOKEN_ENV: &str = "GMAIL_OAUTH_REFRESH_TOKEN";
pub const CLIENT_ID_ENV: &str = "GMAIL_OAUTH_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "GMAIL_OAUTH_CLIENT_SECRET";

/// Raw OAuth2 material for a Gmail account
///
/// Any field may be absent. A usable combination is either an access token,
/// or a refresh token together with the client id and secret it belongs to.
#[derive(Clone, Default)]
pub struct GmailCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl GmailCredentials {
    /// Read credentials from the `GMAIL_OAUTH_*` environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, treating empty values as unset
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            access_token: value(ACCESS_TOKEN_ENV),
            refresh_token: value(REFRESH_TOKEN_ENV),
            client_id: value(CLIENT_ID_ENV),
            client_secret: value(CLIENT_SECRET_ENV),
        }
    }

    /// Fill any field left empty here from `other`
    pub fn or(self, other: GmailCredentials) -> Self {
        Self {
            access_token: self.access_token.or(other.access_token),
            refresh_token: self.refresh_token.or(other.refresh_token),
            client_id: self.client_id.or(other.client_id),
            client_secret: self.client_secret.or(other.client_secret),
        }
    }

    /// Whether a refresh can be attempted with these credentials
    pub fn can_refresh(&self) -> bool {
        self.refresh_parts().is_some()
    }

    fn refresh_parts(&self) -> Option<(&str, &str, &str)> {
        match (&self.refresh_token, &self.client_id, &self.client_secret) {
            (Some(token), Some(id), Some(secret)) => {
                Some((token.as_str(), id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for GmailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailCredentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Holds the current access token and refreshes it when it runs out
pub struct TokenManager {
    client: Option<OAuth2Client>,
    tokens: Mutex<TokenPair>,
}

impl TokenManager {
    /// Obtain an access token against Google's token endpoint
    pub async fn login(credentials: GmailCredentials) -> AuthResult<Self> {
        Self::login_with_token_url(credentials, gmail::TOKEN_URL).await
    }

    /// Obtain an access token, refreshing against `token_url` when possible
    ///
    /// With a refresh token, client id and client secret the access token is
    /// always refreshed up front. Otherwise the supplied access token is used
    /// as is.
    pub async fn login_with_token_url(
        credentials: GmailCredentials,
        token_url: &str,
    ) -> AuthResult<Self> {
        if let Some((refresh_token, client_id, client_secret)) = credentials.refresh_parts() {
            let mut config = gmail::send_config(client_id, client_secret);
            config.token_url = token_url.to_string();
            let client = OAuth2Client::new(config)?;

            let tokens = client.refresh_token(refresh_token).await?;
            info!("Obtained fresh Gmail access token");

            return Ok(Self::with_tokens(Some(client), tokens));
        }

        let access_token = credentials.access_token.ok_or_else(|| {
            AuthError::MissingCredentials(
                "an access token or a refresh token with client id and secret is required"
                    .to_string(),
            )
        })?;
        debug!("Using supplied Gmail access token without refresh");

        Ok(Self::with_tokens(
            None,
            TokenPair {
                access_token,
                refresh_token: credentials.refresh_token,
                expires_at: None,
            },
        ))
    }

    /// Build a manager from an existing token pair
    pub fn with_tokens(client: Option<OAuth2Client>, tokens: TokenPair) -> Self {
        Self {
            client,
            tokens: Mutex::new(tokens),
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.client.is_some()
    }

    /// Return a usable access token, refreshing first if it has expired
    pub async fn access_token(&self) -> AuthResult<String> {
        let mut tokens = self.tokens.lock().await;

        if tokens.is_expired() {
            let client = self.client.as_ref().ok_or(AuthError::TokenExpired)?;
            let refresh_token = tokens.refresh_token.clone().ok_or(AuthError::TokenExpired)?;

            info!("Access token expired, refreshing");
            *tokens = client.refresh_token(&refresh_token).await?;
        }

        Ok(tokens.access_token.clone())
    }
}
