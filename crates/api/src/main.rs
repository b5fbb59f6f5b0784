use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use checkin_gate_api::app::{self, AppState, Ports};
use checkin_gate_api::config::Config;
use checkin_gate_api::jobs::{CertificateWorker, JobScheduler, PoolMetricsJob, QueueDepthJob};
use checkin_gate_api::middleware::{self, logging};
use checkin_gate_api::services::{EmailService, PdfCertificateGenerator};
use domain::ports::CertificateQueue;
use persistence::repositories::{
    PgActivityRepository, PgCheckInRepository, PgEventRepository, PgUserDirectory,
};
use persistence::RedisCertificateQueue;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    logging::init_logging(&config.logging).context("failed to initialize logging")?;
    middleware::init_metrics().context("failed to install Prometheus recorder")?;

    info!("Starting Checkin Gate API v{}", env!("CARGO_PKG_VERSION"));

    let db_config = persistence::db::DatabaseConfig::from(&config.database);
    let pool = persistence::db::create_pool(&db_config)
        .await
        .context("failed to connect to PostgreSQL")?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let queue: Arc<dyn CertificateQueue> = Arc::new(
        RedisCertificateQueue::connect(&config.redis.url, config.redis.queue_key.clone())
            .await
            .context("failed to connect to Redis")?,
    );

    let ports = Ports {
        events: Arc::new(PgEventRepository::new(pool.clone())),
        activities: Arc::new(PgActivityRepository::new(pool.clone())),
        check_ins: Arc::new(PgCheckInRepository::new(pool.clone())),
        users: Arc::new(PgUserDirectory::new(pool.clone())),
        queue: queue.clone(),
    };

    let shutdown = CancellationToken::new();

    let mut scheduler = JobScheduler::new(shutdown.clone());
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.register(QueueDepthJob::new(
        queue.clone(),
        Duration::from_secs(config.worker.queue_depth_interval_secs.max(1)),
    ));
    scheduler.start();

    let worker_handle = if config.worker.enabled {
        let email = EmailService::new(&config.email).context("invalid email configuration")?;
        let worker = CertificateWorker::new(
            queue.clone(),
            Arc::new(PdfCertificateGenerator::new()),
            Arc::new(email),
            (&config.certificate).into(),
            Duration::from_secs(config.worker.poll_timeout_secs),
        );
        Some(tokio::spawn(worker.run(shutdown.clone())))
    } else {
        info!("Certificate worker disabled");
        None
    };

    let addr = config.socket_addr()?;
    let shutdown_timeout = Duration::from_secs(config.worker.shutdown_timeout_secs);
    let state = AppState::new(config, ports, Some(pool)).context("invalid JWT configuration")?;
    let app = app::create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            server_shutdown.cancel();
        })
        .await?;

    // Covers the server exiting without a signal.
    shutdown.cancel();

    if let Some(handle) = worker_handle {
        match tokio::time::timeout(shutdown_timeout, handle).await {
            Ok(Ok(())) => info!("Certificate worker stopped"),
            Ok(Err(e)) => error!(error = %e, "Certificate worker task failed"),
            Err(_) => warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Certificate worker did not stop in time"
            ),
        }
    }
    scheduler.wait_for_shutdown(shutdown_timeout).await;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
