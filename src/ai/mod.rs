pub mod ollama;
pub mod openai;
pub mod prompt;

pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
pub use prompt::PromptTemplate;

use async_trait::async_trait;

use crate::error::GenerationError;

/// Text-completion backend used when no canned answer matches.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Produces an answer to `query` given the rendered conversation `context`.
    async fn generate(&self, context: &str, query: &str) -> Result<String, GenerationError>;
}
