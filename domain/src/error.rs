//! Error taxonomy shared by every layer.

/// Failures the bot distinguishes between.
///
/// Payloads are rendered messages so the variants stay `Clone` and comparable in
/// tests; causes are flattened with `{:#}` when converting from `anyhow`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SupportBotError {
    /// The example corpus could not be read, parsed or embedded. Fatal at startup.
    #[error("corpus load failed: {0}")]
    CorpusLoad(String),
    /// The placeholder file is missing or corrupt. Callers degrade to an empty map.
    #[error("placeholder config unavailable: {0}")]
    PlaceholderConfig(String),
    /// One response generation failed. Session history is left untouched.
    #[error("generation failed: {0}")]
    Generation(String),
}

impl SupportBotError {
    pub fn corpus_load(err: impl std::fmt::Display) -> Self {
        Self::CorpusLoad(format!("{err:#}"))
    }

    pub fn placeholder_config(err: impl std::fmt::Display) -> Self {
        Self::PlaceholderConfig(format!("{err:#}"))
    }

    pub fn generation(err: impl std::fmt::Display) -> Self {
        Self::Generation(format!("{err:#}"))
    }

    /// Only corpus failures stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CorpusLoad(_))
    }
}
