use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::config::{MAX_RECOMMENDATIONS, MEMORY_WINDOW, RETRIEVAL_K};
use crate::state::AppState;

/// Model and pipeline settings with the API key redacted
#[derive(Serialize)]
pub struct ConfigResponse {
    pub provider: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub has_api_key: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub retrieval_k: usize,
    pub max_recommendations: usize,
    pub memory_window: usize,
    pub search_with_enhanced_query: bool,
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let llm = &state.config.llm;
    let pipeline = state.pipeline.settings();
    Json(ConfigResponse {
        provider: llm.provider.clone(),
        base_url: llm.base_url.clone(),
        chat_model: llm.chat_model.clone(),
        embedding_model: llm.embedding_model.clone(),
        has_api_key: llm.api_key.is_some(),
        max_tokens: llm.max_tokens,
        temperature: llm.temperature,
        retrieval_k: RETRIEVAL_K,
        max_recommendations: MAX_RECOMMENDATIONS,
        memory_window: MEMORY_WINDOW,
        search_with_enhanced_query: pipeline.search_with_enhanced_query,
    })
}
