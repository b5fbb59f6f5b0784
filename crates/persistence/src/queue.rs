//! Redis-backed certificate job queue.
//!
//! Jobs are JSON payloads in a Redis list:
//! - **Enqueue**: `LPUSH <key> <payload>`; batches run as one `MULTI/EXEC`
//!   pipeline so the list gains every job or none of them
//! - **Dequeue**: `BRPOP <key> <timeout>`, which pops the oldest entry and
//!   hands each job to exactly one consumer
//!
//! Blocking pops run on a dedicated connection so a parked `BRPOP` never
//! delays producer commands multiplexed on the other one.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::CertificateJob;
use domain::ports::queue::{decode_job, encode_job};
use domain::ports::{CertificateQueue, QueueError};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Default Redis key of the certificate job list.
pub const DEFAULT_QUEUE_KEY: &str = "certificate:jobs";

/// Longest single `BRPOP` issued by [`CertificateQueue::dequeue`]; the call
/// loops until a job arrives.
const BLOCKING_SLICE: Duration = Duration::from_secs(5);

fn transport(err: redis::RedisError) -> QueueError {
    QueueError::Transport(err.to_string())
}

#[derive(Clone)]
pub struct RedisCertificateQueue {
    producer: ConnectionManager,
    consumer: ConnectionManager,
    key: String,
}

impl RedisCertificateQueue {
    /// Connects to Redis and binds the queue to `key`.
    pub async fn connect(redis_url: &str, key: impl Into<String>) -> Result<Self, QueueError> {
        let client = Client::open(redis_url).map_err(transport)?;
        let producer = ConnectionManager::new(client.clone())
            .await
            .map_err(transport)?;
        let consumer = ConnectionManager::new(client).await.map_err(transport)?;

        let queue = Self {
            producer,
            consumer,
            key: key.into(),
        };
        tracing::info!(key = %queue.key, "Connected certificate queue to Redis");
        Ok(queue)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        let mut conn = self.consumer.clone();

        if timeout.is_zero() {
            let payload: Option<String> = conn.rpop(&self.key, None).await.map_err(transport)?;
            return Ok(payload);
        }

        let reply: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await
            .map_err(transport)?;

        Ok(reply.map(|(_key, payload)| payload))
    }
}

#[async_trait]
impl CertificateQueue for RedisCertificateQueue {
    async fn enqueue(&self, job: &CertificateJob) -> Result<(), QueueError> {
        let payload = encode_job(job)?;
        let mut conn = self.producer.clone();
        let _: u64 = conn.lpush(&self.key, payload).await.map_err(transport)?;

        tracing::debug!(job_id = %job.job_id(), key = %self.key, "Certificate job enqueued");
        Ok(())
    }

    async fn enqueue_batch(&self, jobs: &[CertificateJob]) -> Result<(), QueueError> {
        if jobs.is_empty() {
            return Ok(());
        }

        let payloads = jobs.iter().map(encode_job).collect::<Result<Vec<_>, _>>()?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for payload in payloads {
            pipe.lpush(&self.key, payload).ignore();
        }

        let mut conn = self.producer.clone();
        let _: () = pipe.query_async(&mut conn).await.map_err(transport)?;

        tracing::debug!(count = jobs.len(), key = %self.key, "Certificate job batch enqueued");
        Ok(())
    }

    async fn dequeue(&self) -> Result<CertificateJob, QueueError> {
        loop {
            if let Some(payload) = self.pop(BLOCKING_SLICE).await? {
                return decode_job(&payload);
            }
        }
    }

    async fn dequeue_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<CertificateJob>, QueueError> {
        match self.pop(timeout).await? {
            Some(payload) => decode_job(&payload).map(Some),
            None => Ok(None),
        }
    }

    async fn len(&self) -> Result<u64, QueueError> {
        let mut conn = self.producer.clone();
        conn.llen(&self.key).await.map_err(transport)
    }
}
