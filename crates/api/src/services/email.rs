//! Email delivery for certificate emails.
//!
//! Supports two providers:
//! - `console`: Logs emails instead of delivering them (development)
//! - `smtp`: Sends through an SMTP relay with `lettre`

use async_trait::async_trait;
use domain::ports::{EmailError, EmailSender, OutgoingEmail};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use crate::config::EmailConfig;

enum Provider {
    Console,
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
}

/// [`EmailSender`] backed by the configured provider.
pub struct EmailService {
    enabled: bool,
    from: Mailbox,
    provider: Provider,
}

impl EmailService {
    /// Builds the service. Fails when the sender address or the SMTP relay
    /// settings are invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from = mailbox(&config.sender_email, Some(&config.sender_name))?;

        let provider = match config.provider.as_str() {
            "console" => Provider::Console,
            "smtp" => Provider::Smtp(smtp_transport(config)?),
            other => {
                return Err(EmailError::Build(format!(
                    "unknown email provider '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            enabled: config.enabled,
            from,
            provider,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, EmailError> {
        let to = mailbox(&email.to, None)?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(email.html_body.clone()));
        for attachment in &email.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| EmailError::Build(e.to_string()))?;
            body = body.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.content.clone(), content_type),
            );
        }

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(body)
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

fn mailbox(address: &str, name: Option<&str>) -> Result<Mailbox, EmailError> {
    let address = address
        .trim()
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))?;
    Ok(Mailbox::new(
        name.filter(|n| !n.is_empty()).map(str::to_string),
        address,
    ))
}

fn smtp_transport(config: &EmailConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    let builder = if config.smtp_use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| EmailError::Build(e.to_string()))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    let builder = builder.port(config.smtp_port);
    let builder = if config.smtp_username.is_empty() {
        builder
    } else {
        builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ))
    };

    Ok(builder.build())
}

#[async_trait]
impl EmailSender for EmailService {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        if !self.enabled {
            debug!(to = %email.to, subject = %email.subject, "Email service disabled");
            return Err(EmailError::Disabled);
        }

        let message = self.build_message(email)?;

        match &self.provider {
            Provider::Console => {
                let attachment_bytes: usize =
                    email.attachments.iter().map(|a| a.content.len()).sum();
                info!(
                    provider = "console",
                    to = %email.to,
                    subject = %email.subject,
                    attachments = email.attachments.len(),
                    attachment_bytes,
                    "Email (console mode - not actually sent)"
                );
                Ok(())
            }
            Provider::Smtp(transport) => {
                transport.send(message).await.map_err(|e| {
                    warn!(to = %email.to, error = %e, "SMTP delivery failed");
                    EmailError::SendFailed(e.to_string())
                })?;
                info!(provider = "smtp", to = %email.to, "Email sent");
                Ok(())
            }
        }
    }
}
