use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Documents retrieved per turn
pub const RETRIEVAL_K: usize = 5;
/// Accepted recommendations per turn
pub const MAX_RECOMMENDATIONS: usize = 3;
/// Prior (user, assistant) pairs handed to the assistant
pub const MEMORY_WINDOW: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Precomputed menu index file (JSON entries with embeddings)
    pub index_path: PathBuf,
    /// Root directory that dish `image_path` values are resolved against
    pub asset_root: PathBuf,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Pipeline tuning
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for chat, relevance and summaries
    pub chat_model: String,
    /// Model name for query embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stop_sequence: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Search with the cleaned enhanced query instead of the raw user input
    pub search_with_enhanced_query: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            index_path: PathBuf::from("./output/menu_index/index.json"),
            asset_root: PathBuf::from("./data"),
            llm: LlmConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llava".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            api_key: None,
            max_tokens: 2048,
            temperature: 0.0,
            stop_sequence: Some("\n\nHuman".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_with_enhanced_query: false,
        }
    }
}

impl Config {
    /// Build from defaults overridden by environment variables. A `.env`
    /// file in the working directory is loaded first when present.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::default();

        if let Ok(addr) = std::env::var("GOURMET_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("GOURMET_INDEX_PATH") {
            config.index_path = PathBuf::from(path);
        }
        if let Ok(root) = std::env::var("GOURMET_ASSET_ROOT") {
            config.asset_root = PathBuf::from(root);
        }
        if let Ok(val) = std::env::var("GOURMET_SEARCH_WITH_ENHANCED_QUERY") {
            config.pipeline.search_with_enhanced_query = parse_flag(&val);
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(v) = val.parse() {
                config.llm.max_tokens = v;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(v) = val.parse() {
                config.llm.temperature = v;
            }
        }
        if let Ok(stop) = std::env::var("LLM_STOP_SEQUENCE") {
            // An empty value disables the stop sequence
            config.llm.stop_sequence = if stop.is_empty() { None } else { Some(stop) };
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.llm.timeout_secs = v;
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
