//! Samples the certificate queue length into the `certificate_queue_depth` gauge.

use std::sync::Arc;
use std::time::Duration;

use domain::ports::CertificateQueue;

use super::scheduler::Job;

pub struct QueueDepthJob {
    queue: Arc<dyn CertificateQueue>,
    interval: Duration,
}

impl QueueDepthJob {
    pub fn new(queue: Arc<dyn CertificateQueue>, interval: Duration) -> Self {
        Self { queue, interval }
    }
}

#[async_trait::async_trait]
impl Job for QueueDepthJob {
    fn name(&self) -> &'static str {
        "certificate_queue_depth"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> Result<(), String> {
        let depth = self.queue.len().await.map_err(|e| e.to_string())?;
        persistence::metrics::record_queue_depth(depth);
        Ok(())
    }
}
