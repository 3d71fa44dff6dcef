//! Salom AI - multilingual chat assistant
//!
//! Serves a browser chat page and forwards each turn to Gemini with a
//! schema-constrained JSON response carrying the reply and its insight.

mod api;
mod config;
mod conversation;
mod llm;
mod markdown;
mod orchestrator;
mod persona;
mod session;

use api::{create_router, AppState};
use config::Config;
use conversation::ConversationStore;
use llm::{GeminiService, LlmService, LoggingService};
use orchestrator::Orchestrator;
use session::SessionRuntime;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extra time the HTTP client allows beyond the turn timeout, so the
/// turn timeout is the one that fires
const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salom_ai=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;

    // Initialize provider
    let provider: Option<Arc<dyn LlmService>> = match &config.api_key {
        Some(api_key) => {
            let gemini = GeminiService::new(
                api_key.clone(),
                config.model.clone(),
                &config.gemini_base_url,
                config.request_timeout + CLIENT_TIMEOUT_MARGIN,
            )?;
            tracing::info!(
                model = %config.model,
                endpoint = gemini.endpoint(),
                "Gemini provider initialized"
            );
            Some(Arc::new(LoggingService::new(Arc::new(gemini))))
        }
        None => {
            tracing::warn!("No API key configured. Set GEMINI_API_KEY; every turn will fail until then.");
            None
        }
    };

    // Create application state
    let store = Arc::new(ConversationStore::new());
    let orchestrator = Arc::new(Orchestrator::new(provider, config.orchestrator()));
    let model_id = orchestrator.model_id().map(str::to_string);
    let session = SessionRuntime::spawn(store.clone(), orchestrator);

    let state = AppState {
        session,
        store,
        persona: config.persona,
        model_id,
    };

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(persona = config.persona.id(), "Salom AI server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
