//! Outgoing email contract.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service disabled")]
    Disabled,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}
