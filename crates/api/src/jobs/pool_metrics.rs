//! Background job to record connection pool metrics.

use std::time::Duration;

use sqlx::PgPool;

use super::scheduler::Job;

pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(10)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}
