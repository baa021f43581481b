//! HTTP API server for voice onboarding

pub mod error;
pub mod health;
pub mod onboarding;
pub mod rate_limit;
pub mod users;

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use crate::Result;
use crate::config::ServerConfig;

/// Shared state for API handlers
#[derive(Default)]
pub struct ApiState {
    pub rate_limiter: Option<rate_limit::SharedLimiter>,
}

impl ApiState {
    /// State for the given server settings
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            rate_limiter: config.rate_limit_rpm.map(rate_limit::create_limiter),
        }
    }
}

/// Build the router with all routes and middleware
pub fn app(state: Arc<ApiState>) -> Router {
    let router = Router::new()
        .nest("/api/onboarding", onboarding::router())
        .nest("/api/users", users::router())
        .merge(health::router())
        .fallback(error::not_found);

    let router = router.layer(axum::middleware::from_fn_with_state(
        state,
        rate_limit::rate_limit_middleware,
    ));

    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");
    ApiError::Internal.into_response()
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    host: String,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            state: Arc::new(ApiState::from_config(config)),
            host: config.host.clone(),
            port: config.port,
        }
    }

    /// Router for this server
    #[must_use]
    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server on {addr}: {e}")))?;

        if self.state.rate_limiter.is_some() {
            tracing::info!("rate limiting active");
        }

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if the server fails while running
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        if let Ok(local) = listener.local_addr() {
            tracing::info!(addr = %local, "API server listening");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
