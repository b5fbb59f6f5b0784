use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::ports::{
    ActivityRepository, CertificateQueue, CheckInRepository, EventRepository,
    UserAuthorizationService,
};
use domain::services::{
    CheckInActivity, CheckInPolicy, CreateActivities, CreateEvent, EventQueries, FinishEvent,
    ListUserCheckIns,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{activities, check_ins, events, health};

/// Adapters the use cases run against.
#[derive(Clone)]
pub struct Ports {
    pub events: Arc<dyn EventRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pub check_ins: Arc<dyn CheckInRepository>,
    pub users: Arc<dyn UserAuthorizationService>,
    pub queue: Arc<dyn CertificateQueue>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    /// Present when backed by PostgreSQL; health checks ping it.
    pub pool: Option<PgPool>,
    pub queue: Arc<dyn CertificateQueue>,
    pub create_event: Arc<CreateEvent>,
    pub create_activities: Arc<CreateActivities>,
    pub event_queries: Arc<EventQueries>,
    pub check_in_activity: Arc<CheckInActivity>,
    pub finish_event: Arc<FinishEvent>,
    pub list_user_check_ins: Arc<ListUserCheckIns>,
}

impl AppState {
    /// Wires the use cases onto the given ports.
    pub fn new(config: Config, ports: Ports, pool: Option<PgPool>) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(&config.jwt.secret, config.jwt.leeway_secs)?;
        let policy = CheckInPolicy {
            enforce_activity_window: config.check_in.enforce_activity_window,
        };

        let Ports {
            events,
            activities,
            check_ins,
            users,
            queue,
        } = ports;

        Ok(Self {
            create_event: Arc::new(CreateEvent::new(events.clone(), users.clone())),
            create_activities: Arc::new(CreateActivities::new(
                events.clone(),
                activities.clone(),
                users.clone(),
            )),
            event_queries: Arc::new(EventQueries::new(
                events.clone(),
                activities.clone(),
                check_ins.clone(),
            )),
            check_in_activity: Arc::new(CheckInActivity::new(
                events.clone(),
                activities.clone(),
                check_ins.clone(),
                users.clone(),
                policy,
            )),
            finish_event: Arc::new(FinishEvent::new(
                events,
                activities,
                check_ins.clone(),
                users,
                queue.clone(),
            )),
            list_user_check_ins: Arc::new(ListUserCheckIns::new(check_ins)),
            queue,
            pool,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Authenticated through the UserAuth extractor
    let api_routes = Router::new()
        .route("/api/v1/events", post(events::create_event))
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route(
            "/api/v1/events/:event_id/details",
            get(events::get_event_details),
        )
        .route(
            "/api/v1/events/:event_id/activities",
            post(events::create_activities),
        )
        .route("/api/v1/events/:event_id/finish", post(events::finish_event))
        .route(
            "/api/v1/activities/:activity_id/check-in",
            post(activities::check_in),
        )
        .route("/api/v1/me/check-ins", get(check_ins::list_my_check_ins));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
