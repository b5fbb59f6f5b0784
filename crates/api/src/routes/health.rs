//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DependencyHealth>,
    pub queue: QueueHealth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DependencyHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueHealth {
    pub connected: bool,
    /// Pending certificate jobs.
    pub depth: Option<u64>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

async fn check_database(state: &AppState) -> Option<DependencyHealth> {
    let pool = state.pool.as_ref()?;
    let start = std::time::Instant::now();
    let connected = persistence::db::ping(pool).await.is_ok();
    Some(DependencyHealth {
        connected,
        latency_ms: connected.then(|| start.elapsed().as_millis() as u64),
    })
}

async fn check_queue(state: &AppState) -> QueueHealth {
    match state.queue.len().await {
        Ok(depth) => QueueHealth {
            connected: true,
            depth: Some(depth),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Certificate queue health check failed");
            QueueHealth {
                connected: false,
                depth: None,
            }
        }
    }
}

impl HealthResponse {
    fn is_healthy(&self) -> bool {
        self.queue.connected && self.database.as_ref().map_or(true, |db| db.connected)
    }
}

/// Full health check endpoint.
///
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, queue) = tokio::join!(check_database(&state), check_queue(&state));

    let mut response = HealthResponse {
        status: String::new(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        queue,
    };

    let status = if response.is_healthy() {
        response.status = "healthy".to_string();
        StatusCode::OK
    } else {
        response.status = "unhealthy".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe endpoint.
///
/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let (database, queue) = tokio::join!(check_database(&state), check_queue(&state));
    let db_ready = database.map_or(true, |db| db.connected);

    if db_ready && queue.connected {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
