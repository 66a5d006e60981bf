use anyhow::Context;
use domain::models::{Embedding, SupportRecord};
use domain::providers::EmbeddingProvider;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::types::Result;

const BATCH_SIZE: usize = 32;
const IN_FLIGHT: usize = 8;

/// Embeds corpus records through any [`EmbeddingProvider`].
pub struct Embedder<'a, P> {
    provider: &'a P,
}

impl<'a, P: EmbeddingProvider> Embedder<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Output order matches `records`.
    pub async fn embed_records(&self, records: &[SupportRecord]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(records.len());
        for chunk in records.chunks(BATCH_SIZE) {
            tracing::debug!(
                done = embeddings.len(),
                total = records.len(),
                batch = chunk.len(),
                "embedding corpus batch"
            );
            let batch = self.embed_batch(chunk).await?;
            embeddings.extend(batch);
        }
        Ok(embeddings)
    }

    async fn embed_batch(&self, records: &[SupportRecord]) -> Result<Vec<Embedding>> {
        stream::iter(records)
            .map(|record| async move {
                let vector = self
                    .provider
                    .embed(&record.content)
                    .await
                    .with_context(|| format!("embedding record {}", record.id))?;
                Ok::<_, anyhow::Error>(Embedding {
                    id: record.id.clone(),
                    position: record.position,
                    vector,
                    text: record.content.clone(),
                })
            })
            .buffered(IN_FLIGHT)
            .try_collect()
            .await
    }
}
