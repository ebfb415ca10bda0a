pub mod handlers;
pub mod middleware;
pub mod types;

use crate::{
    API_VERSION, Result, SERVICE_NAME,
    auth::{NoopVerifier, TokenVerifier},
    config::Config,
    identify::MAX_TOTAL_IMAGE_BYTES,
    llm::{GeminiClient, LlmClient},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};

pub const ROUTE_ROOT: &str = "/";
pub const ROUTE_HEALTH: &str = "/health";
pub const ROUTE_IDENTIFY: &str = "/api/v2/crystal/identify";
pub const ROUTE_GUIDANCE: &str = "/api/v2/spiritual/guidance";
pub const ROUTE_METRICS: &str = "/api/v2/metrics";

pub const ROUTES: [&str; 5] = [
    ROUTE_ROOT,
    ROUTE_HEALTH,
    ROUTE_IDENTIFY,
    ROUTE_GUIDANCE,
    ROUTE_METRICS,
];

/// Multipart overhead allowance on top of the image ceiling, so oversized
/// uploads reach image validation and get its message.
const BODY_LIMIT_BYTES: usize = MAX_TOTAL_IMAGE_BYTES + 5 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.info.allowed_origins);

    Router::new()
        .route(ROUTE_ROOT, get(handlers::root))
        .route(ROUTE_HEALTH, get(handlers::health))
        .route(
            ROUTE_IDENTIFY,
            post(handlers::identify).layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
        .route(ROUTE_GUIDANCE, post(handlers::guidance))
        .route(ROUTE_METRICS, get(handlers::metrics))
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::request_tracking))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    info!("Starting {} v{}", SERVICE_NAME, API_VERSION);
    info!("Environment: {}", config.server.environment);
    info!("Debug mode: {}", config.server.debug);

    if config.gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; upstream calls will be rejected");
    }

    let llm: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(config.gemini.clone()));

    if config.identity.service_account.is_some() {
        warn!("Identity service account configured but no verifier is installed; requests are anonymous");
    }
    let verifier: Arc<dyn TokenVerifier> = Arc::new(NoopVerifier);

    let app = router(AppState::new(&config, llm, verifier));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down {}", SERVICE_NAME);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
