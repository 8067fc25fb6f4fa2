//! Send an HTML template through the Gmail API
//!
//! Reads GMAIL_SENDER_EMAIL_ADDRESS and GMAIL_OAUTH_* from the environment
//! or a `.env` file. Template values are passed as `key=value` arguments.
//!
//! Run with: cargo run --example send_gmail -- recipient@example.com "Subject" template.html name=Ada

use gmailer::{EmailRequest, EmailSender, GmailSender};
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
    let (recipient, subject, template_path) = match (args.next(), args.next(), args.next()) {
        (Some(recipient), Some(subject), Some(path)) => (recipient, subject, path),
        _ => anyhow::bail!("usage: send_gmail <recipient> <subject> <template.html> [key=value...]"),
    };

    let template = std::fs::read_to_string(&template_path)?;
    let values = args
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), value.to_string())),
            None => Err(anyhow::anyhow!("template value must be key=value, got {}", pair)),
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let sender = GmailSender::from_env().await?;
    let receipt = sender
        .send_email(
            EmailRequest::new(recipient, subject)
                .template(template)
                .values(values),
        )
        .await?;

    println!("Sent: {:?}", receipt);
    Ok(())
}
