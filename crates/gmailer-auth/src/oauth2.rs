//! OAuth2 token refresh
//!
//! Only the refresh grant is used: access tokens are minted from a
//! long-lived refresh token plus the client id/secret it was issued to.
//! Interactive authorization is left to whatever tool produced those values.

use crate::{AuthError, AuthResult};
use oauth2::{
    basic::BasicClient, AuthType, AuthUrl, ClientId, ClientSecret, RefreshToken, Scope,
    TokenResponse, TokenUrl,
};
use tracing::debug;

/// OAuth2 provider configuration
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: Option<String>,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Scopes requested on refresh
    pub scopes: Vec<String>,
}

/// Token pair containing access and refresh tokens
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Access token for API calls
    pub access_token: String,
    /// Refresh token for obtaining new access tokens
    pub refresh_token: Option<String>,
    /// Token expiration timestamp (Unix seconds)
    pub expires_at: Option<i64>,
}

impl TokenPair {
    /// Check if the access token is expired or about to expire
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let now = chrono::Utc::now().timestamp();
                // Consider expired if less than 5 minutes remaining
                expires_at - now < 300
            }
            None => false,
        }
    }
}

/// Client for the token endpoint of an OAuth2 provider
pub struct OAuth2Client {
    config: OAuth2Config,
    client: BasicClient,
}

impl OAuth2Client {
    pub fn new(config: OAuth2Config) -> AuthResult<Self> {
        let client_id = ClientId::new(config.client_id.clone());
        let client_secret = config.client_secret.clone().map(ClientSecret::new);
        let auth_url = AuthUrl::new(config.auth_url.clone())
            .map_err(|e| AuthError::InvalidConfig(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| AuthError::InvalidConfig(format!("Invalid token URL: {}", e)))?;

        // Google accepts client credentials in the form body
        let client = BasicClient::new(client_id, client_secret, auth_url, Some(token_url))
            .set_auth_type(AuthType::RequestBody);

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    /// Refresh an access token using a refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        debug!("Refreshing access token at {}", self.config.token_url);

        let token_response = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .add_scopes(self.config.scopes.iter().cloned().map(Scope::new))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

        let expires_at = token_response.expires_in().map(|duration| {
            chrono::Utc::now().timestamp() + duration.as_secs() as i64
        });

        Ok(TokenPair {
            access_token: token_response.access_token().secret().clone(),
            refresh_token: token_response
                .refresh_token()
                .map(|t| t.secret().clone())
                .or_else(|| Some(refresh_token.to_string())),
            expires_at,
        })
    }
}
