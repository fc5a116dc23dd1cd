use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::client::HttpChatModel;
use crate::pipeline::Pipeline;
use crate::search::vector::MenuIndex;
use crate::search::EmbeddingRetriever;
use crate::session::ChatSession;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Pipeline,
    pub session: Arc<RwLock<ChatSession>>,
    /// Single permit: one turn runs at a time
    pub turn_semaphore: Arc<tokio::sync::Semaphore>,
}

impl AppState {
    /// Wire up the model client and load the menu index. Any failure here is
    /// fatal and the server never starts.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        let model = HttpChatModel::new(http_client.clone(), config.llm.clone())?;

        let index = MenuIndex::open(&config.index_path)?;
        tracing::info!(
            "Loaded {} menu items from {}",
            index.entry_count(),
            index.path().display()
        );
        let retriever = EmbeddingRetriever::new(index, http_client, config.llm.clone());

        let pipeline = Pipeline::new(
            Arc::new(model),
            Arc::new(retriever),
            config.pipeline.clone(),
        );

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// State around an already-built pipeline.
    pub fn with_pipeline(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline,
            session: Arc::new(RwLock::new(ChatSession::new())),
            turn_semaphore: Arc::new(tokio::sync::Semaphore::new(1)),
        }
    }
}
