//! Building the RFC 5322 message handed to a transport

use crate::request::{Body, BodyKind};
use crate::{MailError, MailResult};
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::Message;

/// Build a message with From/To/Subject headers and a single body part
///
/// The body part is wrapped in `multipart/alternative`.
pub fn build_message(from: &str, to: &str, subject: &str, body: &Body) -> MailResult<Message> {
    let content_type = match body.kind {
        BodyKind::Plain => ContentType::TEXT_PLAIN,
        BodyKind::Html => ContentType::TEXT_HTML,
    };

    let body_part = MultiPart::alternative().singlepart(
        SinglePart::builder()
            .header(content_type)
            .body(body.content.clone()),
    );

    Message::builder()
        .from(parse_mailbox(from)?)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .multipart(body_part)
        .map_err(|e| MailError::MessageBuildError(e.to_string()))
}

/// Parse `user@example.com` or `Name <user@example.com>`
pub(crate) fn parse_mailbox(address: &str) -> MailResult<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress(format!("{}: {}", address, e)))
}
