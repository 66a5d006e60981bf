//! Contracts for the hosted collaborators the core talks to.

use crate::models::GenerationResult;
use shared::types::Result;

/// Turns text into a vector for similarity search.
pub trait EmbeddingProvider {
    /// Names the vector space; indexes built under another id are not comparable.
    fn model_id(&self) -> &str;

    fn embed(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<f32>>> + Send;
}

/// Drafts a reply for a fully rendered prompt.
pub trait GenerationProvider {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<GenerationResult>> + Send;
}
