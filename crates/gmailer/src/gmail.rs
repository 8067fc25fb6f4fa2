//! Gmail API backend
//!
//! Sends the complete RFC 5322 message through `users.messages.send`,
//! authorized with an OAuth2 access token carrying the `gmail.send` scope.

use crate::sender::{EmailSender, Receipt};
use crate::{MailError, MailResult};
use async_trait::async_trait;
use base64::Engine;
use gmailer_auth::{gmail as google, GmailCredentials, TokenManager};
use lettre::Message;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com";
pub const SENDER_ADDRESS_ENV: &str = "GMAIL_SENDER_EMAIL_ADDRESS";

const SEND_PATH: &str = "gmail/v1/users/me/messages/send";

#[derive(Serialize)]
struct SendMessageRequest {
    raw: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageResponse {
    id: String,
    thread_id: Option<String>,
}

/// Account and endpoint settings for [`GmailSender`]
#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub sender_address: String,
    pub credentials: GmailCredentials,
    /// Scheme and host of the Gmail API
    pub api_base: String,
    /// OAuth2 token endpoint used for refreshes
    pub token_url: String,
}

impl GmailConfig {
    pub fn new(sender_address: impl Into<String>, credentials: GmailCredentials) -> Self {
        Self {
            sender_address: sender_address.into(),
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: google::TOKEN_URL.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Read the configuration from `GMAIL_SENDER_EMAIL_ADDRESS` and `GMAIL_OAUTH_*`
    ///
    /// The sender address falls back to `SENDER_EMAIL_ADDRESS`.
    pub fn from_env() -> MailResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), but values given here win over the
    /// environment one field at a time
    pub fn from_env_with(
        sender_address: Option<String>,
        credentials: GmailCredentials,
    ) -> MailResult<Self> {
        Self::from_vars_with(sender_address, credentials, |name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, treating empty values as unset
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> MailResult<Self> {
        Self::from_vars_with(None, GmailCredentials::default(), lookup)
    }

    pub fn from_vars_with(
        sender_address: Option<String>,
        credentials: GmailCredentials,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> MailResult<Self> {
        let value = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let sender_address = sender_address
            .filter(|v| !v.is_empty())
            .or_else(|| value(SENDER_ADDRESS_ENV))
            .or_else(|| value(crate::smtp::SENDER_ADDRESS_ENV))
            .ok_or(MailError::MissingConfig(SENDER_ADDRESS_ENV))?;

        let credentials = credentials.or(GmailCredentials::from_vars(&lookup));
        Ok(Self::new(sender_address, credentials))
    }

    fn send_url(&self) -> MailResult<Url> {
        let mut base = Url::parse(&self.api_base)
            .map_err(|e| MailError::InvalidConfig(format!("API base {}: {}", self.api_base, e)))?;

        // Keep any path prefix when joining
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(SEND_PATH)
            .map_err(|e| MailError::InvalidConfig(format!("API base {}: {}", self.api_base, e)))
    }
}

/// Sends email through the Gmail API
pub struct GmailSender {
    sender_address: String,
    tokens: TokenManager,
    client: reqwest::Client,
    send_url: Url,
}

impl GmailSender {
    /// Log in and prepare to send
    ///
    /// Refreshes the access token straight away when a refresh token, client
    /// id and client secret are all available.
    pub async fn connect(config: GmailConfig) -> MailResult<Self> {
        let send_url = config.send_url()?;
        let tokens = TokenManager::login_with_token_url(config.credentials, &config.token_url).await?;

        info!("Gmail API ready for {}", config.sender_address);

        Ok(Self {
            sender_address: config.sender_address,
            tokens,
            client: reqwest::Client::new(),
            send_url,
        })
    }

    pub async fn from_env() -> MailResult<Self> {
        Self::connect(GmailConfig::from_env()?).await
    }
}

/// Encode a message the way `users.messages.send` expects its `raw` field
pub fn encode_raw(message: &Message) -> String {
    base64::engine::general_purpose::URL_SAFE.encode(message.formatted())
}

#[async_trait]
impl EmailSender for GmailSender {
    fn sender_address(&self) -> &str {
        &self.sender_address
    }

    // Recipients are taken from the To header
    async fn deliver(&self, message: Message, _recipient: &str) -> MailResult<Receipt> {
        info!("Sending email via Gmail API");

        let access_token = self.tokens.access_token().await?;
        let request = SendMessageRequest {
            raw: encode_raw(&message),
        };
        debug!("Gmail send request raw length: {} bytes", request.raw.len());

        let response = self
            .client
            .post(self.send_url.clone())
            .bearer_auth(&access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::SendFailed(format!("Gmail API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            warn!("Gmail API returned {}", status);
            return Err(MailError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| MailError::InvalidResponse(e.to_string()))?;

        info!("Email sent successfully via Gmail API (id {})", sent.id);
        Ok(Receipt::Gmail {
            id: sent.id,
            thread_id: sent.thread_id,
        })
    }
}
