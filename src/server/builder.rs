//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_routes;
use super::state::AppState;
use crate::config::DeskConfig;
use crate::core::TokenStore;
use crate::core::csrf::{SESSION_HEADER, TOKEN_HEADER, require_csrf_token};
use anyhow::Result;
use axum::{
    Router,
    http::{HeaderName, Method, header},
    middleware,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for the desk HTTP server
///
/// # Example
///
/// ```ignore
/// let config = DeskConfig::from_yaml_file("desk.yaml")?;
/// ServerBuilder::new()
///     .with_config(config)
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: DeskConfig,
    state: Option<AppState>,
    token_store: Option<Arc<dyn TokenStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: DeskConfig::default(),
            state: None,
            token_store: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: DeskConfig) -> Self {
        self.config = config;
        self
    }

    /// Use prepared state instead of fresh in-memory stores
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Share a CSRF token store with other server instances
    pub fn with_token_store(mut self, store: impl TokenStore + 'static) -> Self {
        self.token_store = Some(Arc::new(store));
        self
    }

    /// Add custom routes to the server
    ///
    /// Custom routes are merged after the built-in ones and share their
    /// CORS and tracing layers.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let mut state = self
            .state
            .unwrap_or_else(|| AppState::in_memory(&self.config));
        if let Some(store) = self.token_store {
            state.csrf = store;
        }

        let csrf_store = state.csrf.clone();
        let mut app = build_routes(state);
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        if self.config.csrf.enabled {
            tracing::info!(ttl_secs = self.config.csrf.ttl_secs, "CSRF protection enabled");
            app = app.layer(middleware::from_fn_with_state(csrf_store, require_csrf_token));
        }

        Ok(app.layer(cors_layer()).layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to `server.host:server.port` from the configuration
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.addr();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(SESSION_HEADER),
            HeaderName::from_static(TOKEN_HEADER),
        ])
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A signal handler that cannot be installed never fires; the other one
/// still can.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
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
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
