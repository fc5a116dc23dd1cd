use anyhow::{Context, Result};

use crate::llm::LanguageModel;
use crate::models::ChatMessage;

const SYSTEM_PROMPT: &str = "You are a culinary assistant designed to summarize the dish \
    description in accordance with the user preference.";

fn build_summary_prompt(dish_description: &str, preference: &str) -> String {
    format!(
        "Write a very short, two-line, savoury summary of the dish that highlights the user's \
         preference and suggests why the dish is perfect for them. Include the dish name, \
         origin, ingredients and anything else the user asked about, in a friendly tone. \
         Reply with the summary only; no preamble such as \"here is your response\".\n\n\
         Dish Description:\n{dish_description}\n\n\
         User Preference:\n{preference}\n"
    )
}

/// Two-line persuasive summary of an accepted dish.
pub async fn summarize_dish(
    model: &dyn LanguageModel,
    dish_description: &str,
    preference: &str,
) -> Result<String> {
    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_summary_prompt(dish_description, preference)),
    ];

    let summary = model
        .invoke(&messages)
        .await
        .context("Dish summary failed")?;
    Ok(summary.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_sections() {
        let prompt = build_summary_prompt("Chicken tikka masala", "creamy curry");
        assert!(prompt.contains("Dish Description:\nChicken tikka masala"));
        assert!(prompt.contains("User Preference:\ncreamy curry"));
        assert!(prompt.contains("two-line"));
    }
}
