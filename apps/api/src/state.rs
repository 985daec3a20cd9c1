use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ContentGenerator;
use crate::generation::store::GenerationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub generator: ContentGenerator,
    /// Memory-backed unless DATABASE_URL is set.
    pub store: Arc<dyn GenerationStore>,
    pub recent_limit: usize,
}

impl AppState {
    pub fn new(config: &Config, generator: ContentGenerator, store: Arc<dyn GenerationStore>) -> Self {
        Self {
            generator,
            store,
            recent_limit: config.recent_limit,
        }
    }
}
