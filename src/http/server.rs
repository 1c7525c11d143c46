//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router for the action surface
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Serve until the shutdown coordinator fires

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::actions::TrustSkill;
use crate::config::ServerConfig;
use crate::http::handlers;
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub skill: Arc<TrustSkill>,
}

/// HTTP server exposing the skill actions.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(skill: Arc<TrustSkill>, config: &ServerConfig) -> Self {
        let router = Self::build_router(config, AppState { skill });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/v1/actions", get(handlers::list_actions))
            .route("/v1/actions/{action}", post(handlers::invoke_action))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
