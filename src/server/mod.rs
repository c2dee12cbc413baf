pub mod config;
pub mod middleware;

use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    routes::{create_api_routes, create_health_routes},
    server::middleware::request_response_logger,
    shutdown::{DatabaseShutdown, ShutdownCoordinator, ShutdownManager},
    stats::StatsService,
};
use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Request bodies are small JSON documents
const MAX_BODY_SIZE: usize = 1024 * 1024;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub stats_service: Arc<StatsService>,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let database_impl = Arc::new(DatabaseManagerImpl::new_from_config(&config).await?);
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;

        let stats_service = Arc::new(StatsService::new(database.clone()));

        Ok(Self {
            config: Arc::new(config),
            database,
            stats_service,
            health_service,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            self.database.migrate().await?;
        }

        let mut shutdown_manager = ShutdownManager::new(SHUTDOWN_TIMEOUT);
        shutdown_manager.register(DatabaseShutdown::new(self.database.clone()));

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on http://{}", addr);

        let signal_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            signal_coordinator.wait_for_shutdown_signal().await;
        });

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        let result = axum::serve(
            listener,
            self.create_app()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_coordinator.requested().await;
            info!("Graceful shutdown initiated");
        })
        .await;

        if let Err(e) = &result {
            error!("Server error: {}", e);
        }

        shutdown_manager.shutdown_all().await;
        info!("Server shutdown complete");

        result.map_err(|e| AppError::Internal(format!("Server error: {}", e)))
    }

    /// Build the full application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .nest(
                "/health",
                create_health_routes().with_state(self.health_service.clone()),
            )
            .nest(
                "/api",
                create_api_routes().layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
            )
            .with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(from_fn(request_response_logger));
        }
        app
    }
}
