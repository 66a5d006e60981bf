//! Retrieval-augmented reply drafting for one session turn.

use crate::prompt;
use anyhow::Context;
use domain::models::GenerationRequest;
use domain::providers::{EmbeddingProvider, GenerationProvider};
use domain::{PlaceholderMap, Session, SupportBotError};
use infrastructure::corpus_store::SupportCorpusStore;
use shared::telemetry::Telemetry;
use std::sync::Arc;

pub const DEFAULT_TOP_K: usize = 3;

pub struct ResponseGenerator<E, G> {
    store: Arc<SupportCorpusStore<E>>,
    provider: G,
    placeholders: PlaceholderMap,
    top_k: usize,
}

impl<E, G> ResponseGenerator<E, G>
where
    E: EmbeddingProvider,
    G: GenerationProvider,
{
    pub fn new(store: Arc<SupportCorpusStore<E>>, provider: G, placeholders: PlaceholderMap) -> Self {
        Self {
            store,
            provider,
            placeholders,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Draft a reply to `message` and record the exchange in `session`.
    ///
    /// The history is only appended to once a final reply exists; on error the session
    /// is exactly as it was.
    pub async fn generate(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<String, SupportBotError> {
        if message.trim().is_empty() {
            return Err(SupportBotError::Generation(
                "message cannot be empty".to_string(),
            ));
        }
        let telemetry = Telemetry::new();

        let contextual_message = session.history.as_context_string(message);
        let best_practice = self
            .store
            .query(&contextual_message, self.top_k)
            .await
            .context("retrieving similar responses")
            .map_err(SupportBotError::generation)?;
        tracing::debug!(
            session = %session.id,
            retrieved = best_practice.len(),
            "retrieved best practices"
        );

        let request = GenerationRequest {
            contextual_message,
            retrieved_examples: best_practice,
        };
        let raw = self
            .provider
            .generate(&prompt::render(&request))
            .await
            .context("calling generation provider")
            .map_err(SupportBotError::generation)?
            .into_text();

        let response = self.placeholders.fill(&raw);
        session.history.append(message, response.as_str());
        tracing::debug!(
            session = %session.id,
            turns = session.history.len(),
            elapsed_ms = telemetry.elapsed_ms(),
            "response generated"
        );
        Ok(response)
    }
}
