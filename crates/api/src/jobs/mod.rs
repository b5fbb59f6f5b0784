//! Background tasks: the certificate worker and the periodic jobs.

mod certificate_worker;
mod pool_metrics;
mod queue_depth;
mod scheduler;

pub use certificate_worker::CertificateWorker;
pub use pool_metrics::PoolMetricsJob;
pub use queue_depth::QueueDepthJob;
pub use scheduler::{Job, JobScheduler};
