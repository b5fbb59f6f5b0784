//! Database and queue metrics.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record database connection pool metrics.
///
/// Call this function periodically to track pool health.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Record the number of certificate jobs waiting in the queue.
pub fn record_queue_depth(depth: u64) {
    gauge!("certificate_queue_depth").set(depth as f64);
}

/// Times a database operation and records it under its query name.
///
/// ```ignore
/// let timer = QueryTimer::new("find_event_by_id");
/// let result = sqlx::query_as::<_, EventEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn query_name(&self) -> &'static str {
        self.query_name
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(self.query_name, duration);
    }
}
