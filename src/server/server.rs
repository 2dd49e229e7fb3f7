//! # DAS Server
//!
//! Main HTTP server combining the registration, table and observability
//! routers over one shared state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::{DasError, DasResult};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::registry::InstanceRegistry;

use super::config::ServerConfig;
use super::observability_routes::observability_routes;
use super::registration_routes::registration_routes;
use super::table_routes::table_routes;

/// State shared by every handler
pub struct AppState {
    pub registry: Arc<InstanceRegistry>,
    pub metrics: Arc<MetricsRegistry>,
    pub config: ServerConfig,
}

impl AppState {
    /// State with a fresh registry knowing the built-in kinds
    pub fn new(config: ServerConfig) -> Self {
        let registry = InstanceRegistry::with_default_kinds(config.batch_size);
        Self::with_registry(config, Arc::new(registry))
    }

    /// State over an existing registry
    pub fn with_registry(config: ServerConfig, registry: Arc<InstanceRegistry>) -> Self {
        Self {
            registry,
            metrics: Arc::new(MetricsRegistry::new()),
            config,
        }
    }
}

/// HTTP server exposing the DAS facade
pub struct DasServer {
    config: ServerConfig,
    state: Arc<AppState>,
    router: Router,
}

impl DasServer {
    /// Create a new server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new server with custom configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    /// Create a server over prepared state
    pub fn with_state(state: Arc<AppState>) -> Self {
        let router = build_router(state.clone());
        Self {
            config: state.config.clone(),
            state,
            router,
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> DasResult<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            DasError::InvalidArgument(format!(
                "invalid socket address '{}': {}",
                self.config.socket_addr(),
                e
            ))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| DasError::internal(format!("failed to bind {}: {}", addr, e)))?;

        let addr_str = addr.to_string();
        Logger::info(Event::Serving.as_str(), &[("addr", addr_str.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DasError::internal(format!("server failed: {}", e)))?;

        Logger::info(Event::ShutdownStart.as_str(), &[("addr", addr_str.as_str())]);
        Ok(())
    }
}

impl Default for DasServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the combined router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health and metrics at root level
        .merge(observability_routes(state.clone()))
        .nest("/v1/registration", registration_routes(state.clone()))
        .nest("/v1/tables", table_routes(state))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until killed
        std::future::pending::<()>().await;
    }
}
