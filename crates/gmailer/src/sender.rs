//! The common sending flow shared by every backend

use crate::request::{Body, EmailRequest};
use crate::MailResult;
use async_trait::async_trait;
use lettre::Message;
use tracing::{debug, info};

/// What a backend reports after accepting a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    /// First line of the SMTP server's reply to the message data
    Smtp { reply: String },
    /// Identifiers assigned by the Gmail API
    Gmail { id: String, thread_id: Option<String> },
}

/// A way of sending email from one configured address
///
/// Backends supply the sender address and the transmission step; validation,
/// templating and message construction are shared.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Address used for the From header and, where relevant, the envelope
    fn sender_address(&self) -> &str;

    /// Build the message object to transmit
    fn build_message(&self, recipient: &str, subject: &str, body: &Body) -> MailResult<Message> {
        crate::message::build_message(self.sender_address(), recipient, subject, body)
    }

    /// Transmit an already built message
    async fn deliver(&self, message: Message, recipient: &str) -> MailResult<Receipt>;

    /// Send an email with plain text or an HTML template
    ///
    /// Fails before any network activity when the body arguments are
    /// missing or conflicting, or an address does not parse.
    async fn send_email(&self, request: EmailRequest) -> MailResult<Receipt> {
        let body = request.resolve_body()?;
        let message = self.build_message(&request.recipient, &request.subject, &body)?;

        debug!(
            "Prepared {:?} message to {} ({} bytes)",
            body.kind,
            request.recipient,
            body.content.len()
        );

        let receipt = self.deliver(message, &request.recipient).await?;
        info!("Email sent to {}", request.recipient);
        Ok(receipt)
    }
}
