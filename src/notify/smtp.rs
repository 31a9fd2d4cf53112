use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use super::{Mailer, OutgoingEmail};
use crate::config::{Credentials, MailConfig};
use crate::error::FundWatchError;

/// SMTP submission with STARTTLS, authenticated with the env credentials
pub struct SmtpMailer {
    transport: SmtpTransport,
    relay: String,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig, credentials: &Credentials) -> Result<Self> {
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .with_context(|| format!("invalid SMTP relay {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(SmtpCredentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(config.timeout()))
            .build();

        Ok(Self {
            transport,
            relay: format!("{}:{}", config.smtp_host, config.smtp_port),
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let message = build_message(email)?;
        debug!("Submitting report to {}", self.relay);
        self.transport.send(&message).map_err(|e| {
            FundWatchError::Delivery(format!("SMTP submission to {} failed: {}", self.relay, e))
        })?;
        Ok(())
    }
}

pub fn build_message(email: &OutgoingEmail) -> Result<Message> {
    let from: Mailbox = email
        .from
        .parse()
        .with_context(|| format!("invalid sender address '{}'", email.from))?;
    let to: Mailbox = email
        .to
        .parse()
        .with_context(|| format!("invalid recipient address '{}'", email.to))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html_body.clone())
        .context("failed to build report email")
}
