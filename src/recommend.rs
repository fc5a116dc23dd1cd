use anyhow::Result;

use crate::llm::relevance::check_relevance;
use crate::llm::summary::summarize_dish;
use crate::llm::LanguageModel;
use crate::models::{Document, RecommendationList};

/// Walk candidates in retrieval order, gate each on relevance to
/// `preference`, and summarize the accepted ones. Stops at `max` acceptances;
/// later candidates are never sent to the model.
pub async fn recommend_dishes(
    model: &dyn LanguageModel,
    candidates: &[Document],
    preference: &str,
    max: usize,
) -> Result<RecommendationList> {
    let mut list = RecommendationList::default();

    for (rank, doc) in candidates.iter().enumerate() {
        if list.len() >= max {
            break;
        }

        let relevance = check_relevance(model, &doc.page_content, preference).await?;
        if !relevance.is_relevant() {
            tracing::debug!("Candidate {rank} ({}) rejected", doc.metadata.image_path);
            continue;
        }

        let summary = summarize_dish(model, &doc.page_content, preference).await?;
        list.push(summary, doc.metadata.clone());
    }

    tracing::info!(
        "Accepted {} of {} candidates",
        list.len(),
        candidates.len()
    );
    Ok(list)
}
