use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Generative backend. `GeminiClient` in production; swapped for a recording
    /// double in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
