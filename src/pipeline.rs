use std::sync::Arc;

use anyhow::Result;

use crate::config::{PipelineConfig, MAX_RECOMMENDATIONS, MEMORY_WINDOW, RETRIEVAL_K};
use crate::llm::assistant::{build_context, decide, Decision};
use crate::llm::image_describe::describe_image;
use crate::llm::query_enhance::enhance_query;
use crate::llm::LanguageModel;
use crate::models::{AssistantReply, ChatTurn, ImageUpload};
use crate::recommend::recommend_dishes;
use crate::search::Retriever;
use crate::session::MemoryPair;

/// Shown in the history for turns that carried only an image.
pub const IMAGE_ONLY_PLACEHOLDER: &str = "[Image Uploaded]";

/// A chat submission with at least some text or an image.
#[derive(Debug, Clone)]
pub struct Submission {
    text: String,
    image: Option<ImageUpload>,
}

impl Submission {
    /// `None` when there is neither non-blank text nor an image.
    pub fn new(text: impl Into<String>, image: Option<ImageUpload>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() && image.is_none() {
            return None;
        }
        Some(Self { text, image })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// Text recorded in the history for this submission.
    pub fn history_text(&self) -> String {
        if self.text.trim().is_empty() {
            IMAGE_ONLY_PLACEHOLDER.to_string()
        } else {
            self.text.clone()
        }
    }
}

/// Fold an image description into the user's request.
pub fn merge_image_description(text: &str, description: &str) -> String {
    format!("I am looking for this dish, recommend similar dishes: {text} {description}")
}

/// The per-turn retrieval and recommendation flow.
#[derive(Clone)]
pub struct Pipeline {
    model: Arc<dyn LanguageModel>,
    retriever: Arc<dyn Retriever>,
    settings: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        retriever: Arc<dyn Retriever>,
        settings: PipelineConfig,
    ) -> Self {
        Self {
            model,
            retriever,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineConfig {
        &self.settings
    }

    /// Run one turn to completion. Steps run strictly in order:
    ///
    /// 1. describe the image, if any, and merge it into the request
    /// 2. enhance and clean the request as a search query
    /// 3. retrieve `RETRIEVAL_K` candidates
    /// 4. let the assistant choose between recommending and conversing
    /// 5. when recommending, gate and summarize the same candidates
    ///
    /// `memory` must hold prior turns only; at most the last `MEMORY_WINDOW`
    /// pairs reach the assistant. Any model or retrieval failure
    /// aborts the turn.
    pub async fn run_turn(&self, submission: &Submission, memory: &[MemoryPair]) -> Result<ChatTurn> {
        let model = self.model.as_ref();
        let original = submission.text();

        let user_input = match submission.image() {
            Some(image) => {
                let description = describe_image(model, image).await?;
                merge_image_description(original, &description)
            }
            None => original.to_string(),
        };

        let enhanced = enhance_query(model, &user_input).await?;
        let search_query = if self.settings.search_with_enhanced_query && !enhanced.is_empty() {
            enhanced.as_str()
        } else {
            user_input.as_str()
        };

        let candidates = self
            .retriever
            .similarity_search(search_query, RETRIEVAL_K)
            .await?;
        let context = build_context(&candidates);

        let envelope = decide(model, &context, &user_input, memory, MEMORY_WINDOW).await?;

        let reply = match envelope.decision {
            Decision::Recommend => {
                // With an image, judge against what was typed rather than the
                // long merged description
                let preference = if submission.image().is_some() {
                    original
                } else {
                    user_input.as_str()
                };
                let list =
                    recommend_dishes(model, &candidates, preference, MAX_RECOMMENDATIONS).await?;
                AssistantReply::Recommendations(list)
            }
            Decision::Converse => AssistantReply::Message(envelope.response.clone()),
        };

        Ok(ChatTurn::new(
            submission.history_text(),
            reply,
            envelope.response,
        ))
    }
}
