use crate::config::Config;
use anyhow::{bail, Context};
use domain::models::GenerationResult;
use domain::providers::{EmbeddingProvider, GenerationProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

/// `/api/chat` wraps the text in a message, `/api/generate` returns it bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplyBody {
    Chat {
        message: Message,
        #[serde(default)]
        done: bool,
    },
    Completion {
        response: String,
        #[serde(default)]
        done: bool,
    },
}

impl ReplyBody {
    fn done(&self) -> bool {
        match self {
            Self::Chat { done, .. } | Self::Completion { done, .. } => *done,
        }
    }

    fn into_result(self) -> GenerationResult {
        match self {
            Self::Chat { message, .. } => GenerationResult::Wrapped {
                content: message.content,
            },
            Self::Completion { response, .. } => GenerationResult::PlainText(response),
        }
    }
}

/// Normalise a provider body: one JSON object, or newline-delimited chunks when the
/// server streamed anyway.
fn parse_reply(body: &str) -> Result<GenerationResult> {
    if let Ok(reply) = serde_json::from_str::<ReplyBody>(body) {
        return Ok(reply.into_result());
    }

    let mut pieces: Vec<GenerationResult> = Vec::new();
    for line in body.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let chunk: ReplyBody = serde_json::from_str(line)
            .with_context(|| format!("malformed provider response: {}", truncate(line, 120)))?;
        let done = chunk.done();
        pieces.push(chunk.into_result());
        if done {
            break;
        }
    }

    let Some(first) = pieces.first() else {
        bail!("provider returned an empty response");
    };
    let wrapped = matches!(first, GenerationResult::Wrapped { .. });
    let content: String = pieces.into_iter().map(GenerationResult::into_text).collect();
    Ok(if wrapped {
        GenerationResult::Wrapped { content }
    } else {
        GenerationResult::PlainText(content)
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
    embed_model: String,
    temperature: f32,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client: Arc::new(client),
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
            embed_model: config.ollama_embed_model.clone(),
            temperature: config.temperature,
        })
    }

    pub async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.embed_model,
            prompt: text,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("contacting Ollama at {}", self.base_url))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Ollama embedding error ({status}): {body}");
        }
        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .context("decoding embedding response")?;
        if embedding_response.embedding.is_empty() {
            bail!("model {} returned an empty embedding", self.embed_model);
        }
        Ok(embedding_response.embedding)
    }

    pub async fn generate_response(&self, prompt: &str) -> Result<GenerationResult> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("contacting Ollama at {}", self.base_url))?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            bail!("Ollama API error ({status}): {text}");
        }
        tracing::debug!(model = %self.model, bytes = text.len(), "chat response received");
        parse_reply(&text)
    }
}

impl EmbeddingProvider for OllamaClient {
    fn model_id(&self) -> &str {
        &self.embed_model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate_embedding(text).await
    }
}

impl GenerationProvider for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        self.generate_response(prompt).await
    }
}
