use serde::{Deserialize, Serialize};

/// One row of the example corpus, serialised to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportRecord {
    pub id: String,
    pub position: usize,
    pub content: String,
}

/// A corpus record together with its vector, as persisted in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub id: String,
    pub position: usize,
    pub vector: Vec<f32>,
    pub text: String,
}

/// Input to a single generation: the history-aware message plus the retrieved examples,
/// most similar first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub contextual_message: String,
    pub retrieved_examples: Vec<String>,
}

/// What a generation provider hands back. Some providers return bare text, others wrap
/// it in a message object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    PlainText(String),
    Wrapped { content: String },
}

impl GenerationResult {
    pub fn into_text(self) -> String {
        match self {
            Self::PlainText(text) => text,
            Self::Wrapped { content } => content,
        }
    }
}
