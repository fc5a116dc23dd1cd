//! Candidate retrieval: the menu vector index and the query-embedding retriever over it.

pub mod vector;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::llm::embeddings::embed_query;
use crate::models::Document;
use vector::MenuIndex;

/// Similarity search over the menu corpus.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Up to `k` documents in the index's similarity order.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

/// Embeds the query with the configured provider, then scans the index.
pub struct EmbeddingRetriever {
    index: MenuIndex,
    client: reqwest::Client,
    config: LlmConfig,
}

impl EmbeddingRetriever {
    pub fn new(index: MenuIndex, client: reqwest::Client, config: LlmConfig) -> Self {
        Self {
            index,
            client,
            config,
        }
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let embedding = embed_query(&self.client, &self.config, query).await?;
        let hits = self.index.search(&embedding, k);
        tracing::info!(
            "Retrieved {} of {} menu items",
            hits.len(),
            self.index.entry_count()
        );
        Ok(hits.into_iter().map(|h| h.document).collect())
    }
}
