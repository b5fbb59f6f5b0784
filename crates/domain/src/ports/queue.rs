//! Certificate job queue contract and its JSON payload codec.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CertificateJob;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to serialize certificate job: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("queue transport error: {0}")]
    Transport(String),

    #[error("malformed certificate job payload: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Ordered, at-least-once channel of certificate jobs.
///
/// Jobs are delivered oldest first to exactly one consumer.
#[async_trait]
pub trait CertificateQueue: Send + Sync {
    async fn enqueue(&self, job: &CertificateJob) -> Result<(), QueueError>;

    /// Submits every job in one transport operation, preserving order.
    /// On error the caller must assume that fewer than all jobs landed.
    async fn enqueue_batch(&self, jobs: &[CertificateJob]) -> Result<(), QueueError>;

    /// Blocks until a job is available.
    async fn dequeue(&self) -> Result<CertificateJob, QueueError>;

    /// Blocks for at most `timeout`; `Ok(None)` means nothing arrived.
    async fn dequeue_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<CertificateJob>, QueueError>;

    async fn len(&self) -> Result<u64, QueueError>;

    async fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.len().await? == 0)
    }
}

pub fn encode_job(job: &CertificateJob) -> Result<String, QueueError> {
    serde_json::to_string(job).map_err(QueueError::Serialization)
}

pub fn decode_job(payload: &str) -> Result<CertificateJob, QueueError> {
    serde_json::from_str(payload).map_err(QueueError::Malformed)
}
