//! gmailer: send templated email
//!
//! Builds a message from a subject, a recipient and either plain text or an
//! HTML template with `{key}` placeholders, then sends it through one of two
//! backends:
//! - [`SmtpSender`]: authenticated SMTP session (password or XOAUTH2)
//! - [`GmailSender`]: Gmail API `users.messages.send` with an OAuth2 token

mod error;
pub mod gmail;
mod message;
mod request;
mod sender;
pub mod smtp;
mod template;

pub use error::{MailError, MailResult};
pub use gmail::{GmailConfig, GmailSender};
pub use gmailer_auth::GmailCredentials;
pub use message::build_message;
pub use request::{Body, BodyKind, EmailRequest};
pub use sender::{EmailSender, Receipt};
pub use smtp::{SmtpAuth, SmtpConfig, SmtpSecurity, SmtpSender};
pub use template::{format_template, TemplateValues};
