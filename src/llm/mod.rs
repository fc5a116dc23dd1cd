//! Language-model calls: the provider client plus one module per prompt.

pub mod assistant;
pub mod client;
pub mod embeddings;
pub mod image_describe;
pub mod query_enhance;
pub mod relevance;
pub mod summary;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ChatMessage;

/// Anything that turns an ordered list of role-tagged messages into a single
/// text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String>;
}
