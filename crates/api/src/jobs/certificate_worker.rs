//! Certificate worker.
//!
//! Pops certificate jobs off the queue, renders the PDF on the blocking
//! pool and mails it to the participant. A failed job is logged and dropped;
//! nothing is retried or re-queued.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::models::CertificateJob;
use domain::ports::{CertificateGenerator, CertificateQueue, EmailSender, QueueError};
use domain::services::{build_certificate_data, build_certificate_email, CertificateSettings};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::middleware::metrics::{record_job_processed, JobOutcome};

/// Pause after a transport failure before polling again.
const TRANSPORT_BACKOFF: Duration = Duration::from_secs(1);

pub struct CertificateWorker {
    queue: Arc<dyn CertificateQueue>,
    generator: Arc<dyn CertificateGenerator>,
    email: Arc<dyn EmailSender>,
    settings: CertificateSettings,
    poll_timeout: Duration,
}

impl CertificateWorker {
    pub fn new(
        queue: Arc<dyn CertificateQueue>,
        generator: Arc<dyn CertificateGenerator>,
        email: Arc<dyn EmailSender>,
        settings: CertificateSettings,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            generator,
            email,
            settings,
            poll_timeout,
        }
    }

    /// Runs until `shutdown` is cancelled. A job that is already being
    /// processed is finished before the loop exits.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            poll_timeout_secs = self.poll_timeout.as_secs(),
            "Certificate worker started"
        );

        loop {
            let polled = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                polled = self.queue.dequeue_with_timeout(self.poll_timeout) => polled,
            };

            match polled {
                Ok(Some(job)) => {
                    self.process_job(job).await;
                }
                Ok(None) => debug!("No certificate jobs within poll window"),
                Err(QueueError::Malformed(e)) => {
                    error!(error = %e, "Discarding malformed certificate job");
                }
                Err(e) => {
                    error!(error = %e, "Failed to dequeue certificate job");
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(TRANSPORT_BACKOFF) => {}
                    }
                }
            }
        }

        info!("Certificate worker stopped");
    }

    /// Renders and delivers one certificate.
    pub async fn process_job(&self, job: CertificateJob) -> JobOutcome {
        let event = job.event_info();
        let user = job.user_info();
        let activity = job.activity_info();
        info!(
            job_id = %job.job_id(),
            event_id = %event.event_id,
            event_name = %event.event_name,
            user_id = %user.user_id,
            user_email = %user.user_email,
            activity_id = %activity.activity_id,
            activity_name = %activity.activity_name,
            checked_at = %job.checked_at(),
            enqueued_at = %job.enqueued_at(),
            "Processing certificate job"
        );

        let outcome = self.render_and_send(&job).await;
        record_job_processed(outcome);
        outcome
    }

    async fn render_and_send(&self, job: &CertificateJob) -> JobOutcome {
        let data = build_certificate_data(job, &self.settings, Utc::now());
        let generator = Arc::clone(&self.generator);

        let rendered =
            tokio::task::spawn_blocking(move || generator.generate(&data)).await;

        let pdf = match rendered {
            Ok(Ok(pdf)) => pdf,
            Ok(Err(e)) => {
                error!(job_id = %job.job_id(), error = %e, "Failed to render certificate");
                return JobOutcome::RenderFailed;
            }
            Err(e) => {
                error!(job_id = %job.job_id(), error = %e, "Certificate rendering task failed");
                return JobOutcome::RenderFailed;
            }
        };

        info!(job_id = %job.job_id(), size_bytes = pdf.len(), "Certificate rendered");

        let email = build_certificate_email(job, &self.settings, pdf);
        if let Err(e) = self.email.send(&email).await {
            warn!(
                job_id = %job.job_id(),
                email = %email.to,
                error = %e,
                "Failed to send certificate email"
            );
            return JobOutcome::SendFailed;
        }

        info!(job_id = %job.job_id(), email = %email.to, "Certificate email sent");
        JobOutcome::Sent
    }
}
