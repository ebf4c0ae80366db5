//! # server
//!
//! HTTP surface for the diurnal utilization models: `/fit-model`,
//! `/predict`, `/forecast`, plus health and model inspection endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use model_facade::{ForecastConfig, ModelError, ModelServiceBuilder};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "server=info,model_core=info,tower_http=info";

/// Install the global `tracing` subscriber.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // A subscriber may already be installed (e.g. by an embedding binary)
    if tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()
        .is_err()
    {
        warn!("Tracing subscriber already initialised");
    }
}

/// Build the shared state for a configuration.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ModelError> {
    let service = ModelServiceBuilder::new()
        .forecast_config(ForecastConfig::default().with_strict_interval(config.strict_interval))
        .build()?;
    Ok(AppState::new(
        service,
        config.fit_timeout,
        config.max_upload_bytes,
    ))
}

/// Build the router with middleware.
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .route("/health", get(routes::liveness))
        // Model endpoints
        .route("/fit-model", post(routes::fit_model))
        .route("/predict", get(routes::predict))
        .route("/forecast", post(routes::forecast))
        .route("/models", get(routes::list_models))
        // Middleware layers
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr()?;
    let app = router(build_state(&config)?);

    info!(
        "diurnal server v{} listening on {} (fit timeout {}s, strict interval {})",
        env!("CARGO_PKG_VERSION"),
        addr,
        config.fit_timeout.as_secs(),
        config.strict_interval
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
