//! Periodic background jobs.
//!
//! Jobs share the process-wide [`CancellationToken`], so the same signal
//! that stops the certificate worker also stops them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A job run on a fixed interval.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// The name of this job (used for logging).
    fn name(&self) -> &'static str;

    fn interval(&self) -> Duration;

    /// Execute the job. Returns Ok(()) on success, Err with message on failure.
    async fn execute(&self) -> Result<(), String>;
}

pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            jobs: Vec::new(),
            shutdown,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawns one task per registered job. The first run happens one
    /// interval after start.
    pub fn start(&mut self) {
        info!("Starting job scheduler with {} jobs", self.jobs.len());

        for job in &self.jobs {
            let job = Arc::clone(job);
            let shutdown = self.shutdown.clone();

            let handle = tokio::spawn(async move {
                let name = job.name();
                let mut interval = tokio::time::interval(job.interval());
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

                // Skip the first immediate tick
                interval.tick().await;

                info!(job = name, interval_secs = job.interval().as_secs(), "Job scheduled");

                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => {
                            info!(job = name, "Job shutting down");
                            break;
                        }
                        _ = interval.tick() => {
                            let start = std::time::Instant::now();
                            match job.execute().await {
                                Ok(()) => debug!(
                                    job = name,
                                    elapsed_ms = start.elapsed().as_millis() as u64,
                                    "Job completed"
                                ),
                                Err(e) => error!(
                                    job = name,
                                    elapsed_ms = start.elapsed().as_millis() as u64,
                                    error = %e,
                                    "Job failed"
                                ),
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Waits for every job task to stop once the token is cancelled.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let shutdown_future = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(timeout, shutdown_future).await {
            Ok(()) => info!("All jobs completed gracefully"),
            Err(_) => warn!("Job shutdown timed out after {:?}", timeout),
        }
    }
}
