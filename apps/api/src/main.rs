mod bank;
mod config;
mod errors;
mod export;
mod ingest;
mod llm_client;
mod routes;
mod sections;
mod state;
mod suggest;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ingest::{ExtractorKind, LlmExtractor, MarkdownExtractor, ParserOptions, SectionExtractor};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::sections::TitleAliases;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on inconsistent env)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    let llm = config
        .anthropic_api_key
        .clone()
        .map(|key| LlmClient::new(key, config.llm_model.clone()));
    match &llm {
        Some(client) => info!("LLM client initialized (model: {})", client.model()),
        None => info!("ANTHROPIC_API_KEY not set; AI suggestions disabled"),
    }

    let extractor: Arc<dyn SectionExtractor> = match (config.extractor, &llm) {
        (ExtractorKind::Llm, Some(client)) => Arc::new(LlmExtractor::new(client.clone())),
        _ => Arc::new(MarkdownExtractor {
            options: ParserOptions {
                level1_heading: config.level1_heading,
            },
        }),
    };
    info!("Section extractor: {}", extractor.backend());

    let aliases = TitleAliases::with_extra(config.section_aliases.clone());
    info!("Section title aliases: {}", aliases.len());

    let state = AppState::new(config.clone(), extractor, llm, aliases);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
