use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_embed_model: String,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub corpus_path: PathBuf,
    pub index_path: PathBuf,
    pub placeholders_path: PathBuf,
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing or unparseable values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            ollama_base_url: string("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: string("OLLAMA_MODEL", "llama3.2"),
            ollama_embed_model: string("OLLAMA_EMBED_MODEL", "nomic-embed-text"),
            temperature: parsed(&lookup, "GENERATION_TEMPERATURE", 0.7),
            request_timeout_secs: parsed(&lookup, "REQUEST_TIMEOUT_SECS", 120),
            corpus_path: string("CORPUS_PATH", "Customer_Service_Assistants.csv").into(),
            index_path: string("INDEX_PATH", "support_index.db").into(),
            placeholders_path: string("PLACEHOLDERS_PATH", "support_details.json").into(),
            top_k: parsed(&lookup, "RETRIEVAL_TOP_K", 3),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }),
        None => default,
    }
}
