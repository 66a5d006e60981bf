pub mod config;
pub mod corpus_loader;
pub mod corpus_store;
pub mod embedder;
pub mod embedding_storage;
pub mod ollama_client;
pub mod placeholder_config;
pub mod search;
