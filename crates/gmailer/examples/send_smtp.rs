//! Send a plain text email over SMTP
//!
//! Reads SENDER_EMAIL_ADDRESS / SENDER_EMAIL_PASSWORD (and optionally
//! EMAIL_SERVER / EMAIL_SERVER_PORT) from the environment or a `.env` file.
//!
//! Run with: cargo run --example send_smtp -- recipient@example.com "Subject" "Body text"

use gmailer::{EmailRequest, EmailSender, SmtpSender};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gmailer=debug")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (recipient, subject, text) = match (args.next(), args.next(), args.next()) {
        (Some(recipient), Some(subject), Some(text)) => (recipient, subject, text),
        _ => anyhow::bail!("usage: send_smtp <recipient> <subject> <text>"),
    };

    let sender = SmtpSender::from_env()?;
    let receipt = sender
        .send_email(EmailRequest::new(recipient, subject).text(text))
        .await?;

    println!("Sent: {:?}", receipt);
    Ok(())
}
