mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ProviderKind};
use crate::db::{create_pool, ensure_schema};
use crate::generation::generator::ContentGenerator;
use crate::generation::store::{GenerationStore, MemoryStore, PgStore};
use crate::llm_client::{CompletionProvider, GeminiClient, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing provider key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Content API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion provider
    let provider = build_provider(&config)?;
    info!("Completion provider initialized ({})", provider.name());
    let generator = ContentGenerator::new(provider);

    // Initialize generation store
    let store: Arc<dyn GenerationStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, keeping generations in memory");
            Arc::new(MemoryStore::new())
        }
    };

    // Build app state
    let state = AppState::new(&config, generator, store);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the configured completion provider.
fn build_provider(config: &Config) -> Result<Arc<dyn CompletionProvider>> {
    let api_key = config.llm_api_key.clone();
    let model = config.llm_model.clone();

    let provider: Arc<dyn CompletionProvider> = match config.llm_provider {
        ProviderKind::Gemini => Arc::new(GeminiClient::new(api_key, model)?),
        ProviderKind::OpenAi => Arc::new(OpenAiClient::new(api_key, model)?),
    };
    Ok(provider)
}
