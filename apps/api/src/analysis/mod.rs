// Resume analysis: mode selection, prompt templates, the analysis pipeline and its routes.
// All model calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod mode;
pub mod models;
pub mod prompts;
