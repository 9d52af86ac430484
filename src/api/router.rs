//! HTTP router and server.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{api_info, current_session, dashboard, health, AppState};

/// Create the router with an empty session resolver.
pub fn create_router() -> Router {
    create_router_with_state(AppState::default())
}

/// Create the router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    let api_v1 = Router::new()
        .route("/", get(api_info))
        .route("/session", get(current_session));

    Router::new()
        .route("/", get(dashboard))
        .route("/dashboard", get(dashboard))
        .route("/health", get(health))
        .nest("/api/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Finish in-flight requests on Ctrl-C instead of dropping them.
    pub graceful_shutdown: bool,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            graceful_shutdown: true,
        }
    }

    pub fn without_graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = false;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 3000)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Start the HTTP server.
pub async fn serve(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dashboard listening on http://{}", addr);

    let server = axum::serve(listener, router);
    if config.graceful_shutdown {
        server.with_graceful_shutdown(shutdown_signal()).await?;
    } else {
        server.await?;
    }

    Ok(())
}
