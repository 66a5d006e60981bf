use crate::corpus_loader::CorpusLoader;
use crate::embedder::Embedder;
use crate::embedding_storage::{EmbeddingStorage, IndexMeta};
use crate::search;
use anyhow::Context;
use domain::models::Embedding;
use domain::providers::EmbeddingProvider;
use domain::SupportBotError;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::path::Path;

/// Where the served vectors came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// Read back from the persisted index.
    Loaded,
    /// Embedded from the corpus during this start.
    Built,
}

/// The example corpus, embedded and ready for similarity queries.
///
/// Immutable once loaded; wrap in an `Arc` to share between sessions.
pub struct SupportCorpusStore<P> {
    embeddings: Vec<Embedding>,
    provider: P,
    origin: IndexOrigin,
}

impl<P: EmbeddingProvider> SupportCorpusStore<P> {
    /// Serve the persisted index at `index_path`, building it from `corpus_path` first
    /// when it is missing or was built from different corpus bytes or another embedding
    /// model.
    pub async fn load(
        index_path: &Path,
        corpus_path: &Path,
        provider: P,
    ) -> std::result::Result<Self, SupportBotError> {
        Self::open(index_path, corpus_path, provider, false)
            .await
            .map_err(SupportBotError::corpus_load)
    }

    /// Re-embed the corpus regardless of what is persisted. The previous index stays on
    /// disk until the new one is complete.
    pub async fn rebuild(
        index_path: &Path,
        corpus_path: &Path,
        provider: P,
    ) -> std::result::Result<Self, SupportBotError> {
        Self::open(index_path, corpus_path, provider, true)
            .await
            .map_err(SupportBotError::corpus_load)
    }

    async fn open(index_path: &Path, corpus_path: &Path, provider: P, force: bool) -> Result<Self> {
        let corpus = CorpusLoader::new(corpus_path);
        // The connection is not `Sync`; keep it out of the await below.
        let persisted = {
            let storage = EmbeddingStorage::open(index_path)?;
            if force {
                None
            } else {
                Self::reusable_index(&storage, &corpus, provider.model_id())?
            }
        };

        if let Some(embeddings) = persisted {
            tracing::info!(
                index = %index_path.display(),
                records = embeddings.len(),
                "loaded vectors from persisted index"
            );
            return Ok(Self {
                embeddings,
                provider,
                origin: IndexOrigin::Loaded,
            });
        }
        Self::build(&corpus, index_path, provider).await
    }

    /// The persisted rows, if they were built by `model_id` from the corpus currently
    /// on disk.
    fn reusable_index(
        storage: &EmbeddingStorage,
        corpus: &CorpusLoader,
        model_id: &str,
    ) -> Result<Option<Vec<Embedding>>> {
        let Some(stored) = storage.meta()? else {
            return Ok(None);
        };
        if stored.embedding_model != model_id {
            tracing::info!(
                stored = %stored.embedding_model,
                current = %model_id,
                "embedding model changed since the index was built, rebuilding"
            );
            return Ok(None);
        }
        match corpus.fingerprint() {
            Ok(current) if current == stored.corpus_fingerprint => {
                Ok(Some(storage.get_all_embeddings()?))
            }
            Ok(_) => {
                tracing::info!(
                    corpus = %corpus.path().display(),
                    "corpus changed since the index was built, rebuilding"
                );
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(
                    error = %format!("{err:#}"),
                    "corpus unreadable, serving the persisted index as is"
                );
                Ok(Some(storage.get_all_embeddings()?))
            }
        }
    }

    async fn build(corpus: &CorpusLoader, index_path: &Path, provider: P) -> Result<Self> {
        let telemetry = Telemetry::new();
        let snapshot = corpus.load()?;
        let embeddings = Embedder::new(&provider)
            .embed_records(&snapshot.records)
            .await?;
        let meta = IndexMeta {
            corpus_fingerprint: snapshot.fingerprint,
            embedding_model: provider.model_id().to_string(),
        };
        EmbeddingStorage::open(index_path)?
            .replace_all(&embeddings, &meta)
            .with_context(|| format!("persisting index to {}", index_path.display()))?;
        tracing::info!(
            corpus = %corpus.path().display(),
            index = %index_path.display(),
            records = embeddings.len(),
            elapsed_ms = telemetry.elapsed_ms(),
            "created and saved vectors to index"
        );
        Ok(Self {
            embeddings,
            provider,
            origin: IndexOrigin::Built,
        })
    }

    /// Raw text of the `k` records nearest to `text`, most similar first.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<String>> {
        if k == 0 || self.embeddings.is_empty() {
            return Ok(Vec::new());
        }
        let query_embedding = self
            .provider
            .embed(text)
            .await
            .context("embedding query")?;
        let hits = search::nearest(&query_embedding, &self.embeddings, k)?;
        for hit in &hits {
            tracing::debug!(id = %hit.example.id, score = hit.score, "retrieved example");
        }
        Ok(hits
            .into_iter()
            .map(|hit| hit.example.text.clone())
            .collect())
    }

    pub fn origin(&self) -> IndexOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}
