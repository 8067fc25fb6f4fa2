//! SMTP backend

use crate::message::parse_mailbox;
use crate::sender::{EmailSender, Receipt};
use crate::{MailError, MailResult};
use async_trait::async_trait;
use lettre::{
    address::Envelope,
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const SENDER_ADDRESS_ENV: &str = "SENDER_EMAIL_ADDRESS";
pub const SENDER_PASSWORD_ENV: &str = "SENDER_EMAIL_PASSWORD";
pub const SERVER_ENV: &str = "EMAIL_SERVER";
pub const SERVER_PORT_ENV: &str = "EMAIL_SERVER_PORT";

/// How the SMTP session is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    StartTls,
    /// TLS from the first byte (port 465)
    Tls,
    /// No encryption; only for local relays
    None,
}

/// Secret used to log in
#[derive(Clone, PartialEq, Eq)]
pub enum SmtpAuth {
    /// PLAIN/LOGIN with a password or app password
    Password(String),
    /// XOAUTH2 with an OAuth2 access token
    XOAuth2(String),
}

impl SmtpAuth {
    fn secret(&self) -> &str {
        match self {
            SmtpAuth::Password(secret) | SmtpAuth::XOAuth2(secret) => secret,
        }
    }

    fn mechanisms(&self) -> Vec<Mechanism> {
        match self {
            SmtpAuth::Password(_) => vec![Mechanism::Plain, Mechanism::Login],
            SmtpAuth::XOAuth2(_) => vec![Mechanism::Xoauth2],
        }
    }
}

impl std::fmt::Debug for SmtpAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmtpAuth::Password(_) => f.write_str("Password(<redacted>)"),
            SmtpAuth::XOAuth2(_) => f.write_str("XOAuth2(<redacted>)"),
        }
    }
}

/// Connection and login settings for [`SmtpSender`]
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Used as login name, From header and envelope sender
    pub sender_address: String,
    pub auth: SmtpAuth,
}

impl SmtpConfig {
    /// Log in with a password on the default server
    pub fn password(sender_address: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_auth(sender_address.into(), SmtpAuth::Password(password.into()))
    }

    /// Log in with an OAuth2 access token on the default server
    pub fn xoauth2(sender_address: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::with_auth(sender_address.into(), SmtpAuth::XOAuth2(access_token.into()))
    }

    fn with_auth(sender_address: String, auth: SmtpAuth) -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            security: SmtpSecurity::default(),
            sender_address,
            auth,
        }
    }

    /// Use another server
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_security(mut self, security: SmtpSecurity) -> Self {
        self.security = security;
        self
    }

    /// Read the configuration from `SENDER_EMAIL_*` and `EMAIL_SERVER*`
    pub fn from_env() -> MailResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, treating empty values as unset
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> MailResult<Self> {
        let value = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let sender_address =
            value(SENDER_ADDRESS_ENV).ok_or(MailError::MissingConfig(SENDER_ADDRESS_ENV))?;
        let password =
            value(SENDER_PASSWORD_ENV).ok_or(MailError::MissingConfig(SENDER_PASSWORD_ENV))?;

        let mut config = Self::password(sender_address, password);

        if let Some(host) = value(SERVER_ENV) {
            config.host = host;
        }
        if let Some(port) = value(SERVER_PORT_ENV) {
            config.port = port.trim().parse().map_err(|e| {
                MailError::InvalidConfig(format!("{}={}: {}", SERVER_PORT_ENV, port, e))
            })?;
        }

        Ok(config)
    }
}

/// Sends email over an authenticated SMTP session
pub struct SmtpSender {
    config: SmtpConfig,
}

impl SmtpSender {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> MailResult<Self> {
        Ok(Self::new(SmtpConfig::from_env()?))
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn transport(&self) -> MailResult<AsyncSmtpTransport<Tokio1Executor>> {
        let host = self.config.host.as_str();

        // lettre only checks the TLS server name once connected
        url::Host::parse(host)
            .map_err(|e| MailError::ConnectionFailed(format!("invalid host {:?}: {}", host, e)))?;

        let builder = match self.config.security {
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::ConnectionFailed(e.to_string()))?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| MailError::ConnectionFailed(e.to_string()))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        let auth = &self.config.auth;
        Ok(builder
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.sender_address.clone(),
                auth.secret().to_string(),
            ))
            .authentication(auth.mechanisms())
            .build())
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    fn sender_address(&self) -> &str {
        &self.config.sender_address
    }

    async fn deliver(&self, message: Message, recipient: &str) -> MailResult<Receipt> {
        info!(
            "Sending email via SMTP {}:{} ({:?})",
            self.config.host, self.config.port, self.config.security
        );

        let transport = self.transport()?;

        // Envelope sender is the login address, envelope recipient is exactly `recipient`
        let envelope = Envelope::new(
            Some(parse_mailbox(&self.config.sender_address)?.email),
            vec![parse_mailbox(recipient)?.email],
        )
        .map_err(|e| MailError::MessageBuildError(e.to_string()))?;
        debug!("SMTP envelope: {:?}", envelope);

        let response = transport
            .send_raw(&envelope, &message.formatted())
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        let reply = match response.first_line() {
            Some(line) => format!("{} {}", response.code(), line),
            None => response.code().to_string(),
        };

        info!("Email accepted by SMTP server: {}", reply);
        Ok(Receipt::Smtp { reply })
    }
}
