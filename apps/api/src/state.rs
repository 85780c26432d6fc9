use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::bank::Workspace;
use crate::config::Config;
use crate::ingest::SectionExtractor;
use crate::llm_client::LlmClient;
use crate::sections::TitleAliases;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable section extractor. Default: MarkdownExtractor. Swap via EXTRACTOR env.
    pub extractor: Arc<dyn SectionExtractor>,
    /// Present only when ANTHROPIC_API_KEY is configured; snippet suggestions need it.
    pub llm: Option<LlmClient>,
    /// The session's bank and résumé, and the alias table they are keyed by.
    pub workspace: Arc<RwLock<Workspace>>,
    /// Held for the duration of an import; a second import is refused.
    pub import_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: Config,
        extractor: Arc<dyn SectionExtractor>,
        llm: Option<LlmClient>,
        aliases: TitleAliases,
    ) -> Self {
        Self {
            config,
            extractor,
            llm,
            workspace: Arc::new(RwLock::new(Workspace::new(aliases))),
            import_gate: Arc::new(Mutex::new(())),
        }
    }
}
