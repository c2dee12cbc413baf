use crate::database::DatabaseManager;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{signal, sync::watch, time::timeout};
use tracing::{error, info, warn};

pub type ShutdownResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Broadcasts a one-shot shutdown request to everything that subscribed
#[derive(Clone)]
pub struct ShutdownCoordinator {
    requested: Arc<AtomicBool>,
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            tx: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }

    /// Request shutdown; repeated calls are no-ops
    pub fn initiate_shutdown(&self) {
        if self
            .requested
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
        {
            info!("Initiating graceful shutdown");
            self.tx.send_replace(true);
        }
    }

    /// Block until Ctrl+C or SIGTERM, then request shutdown
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
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
            _ = ctrl_c => info!("Received Ctrl+C"),
            _ = terminate => info!("Received SIGTERM"),
        }

        self.initiate_shutdown();
    }

    /// Resolves once shutdown has been requested
    pub async fn requested(&self) {
        let mut rx = self.subscribe();
        if rx.wait_for(|requested| *requested).await.is_err() {
            warn!("Shutdown channel closed before a request was sent");
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// A component released in order once the server stops accepting requests
#[async_trait::async_trait]
pub trait GracefulShutdown: Send + Sync {
    fn name(&self) -> &str;

    async fn shutdown(&self) -> ShutdownResult;
}

/// Shuts registered components down in registration order, each under a timeout
pub struct ShutdownManager {
    components: Vec<Box<dyn GracefulShutdown>>,
    timeout_duration: Duration,
}

impl ShutdownManager {
    pub fn new(timeout_duration: Duration) -> Self {
        Self {
            components: Vec::new(),
            timeout_duration,
        }
    }

    pub fn register<T>(&mut self, component: T)
    where
        T: GracefulShutdown + 'static,
    {
        self.components.push(Box::new(component));
    }

    pub async fn shutdown_all(&self) {
        info!(components = self.components.len(), "Shutting down components");

        for component in &self.components {
            let name = component.name();
            match timeout(self.timeout_duration, component.shutdown()).await {
                Ok(Ok(())) => info!(component = name, "Component shut down"),
                Ok(Err(e)) => error!(component = name, error = %e, "Component shutdown failed"),
                Err(_) => error!(
                    component = name,
                    timeout_secs = self.timeout_duration.as_secs(),
                    "Component shutdown timed out"
                ),
            }
        }
    }
}

/// Closes the database pool
pub struct DatabaseShutdown {
    database: Arc<dyn DatabaseManager>,
}

impl DatabaseShutdown {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }
}

#[async_trait::async_trait]
impl GracefulShutdown for DatabaseShutdown {
    fn name(&self) -> &str {
        "database"
    }

    async fn shutdown(&self) -> ShutdownResult {
        self.database.close().await?;
        Ok(())
    }
}
