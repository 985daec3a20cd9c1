// Content generation: request model, prompt building, response parsing,
// orchestration and persistence of finished generations.
// All provider calls go through llm_client::CompletionProvider.

pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod request;
pub mod store;
