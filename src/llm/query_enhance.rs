use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::llm::LanguageModel;
use crate::models::ChatMessage;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("tag pattern is a valid regex"));

const SYSTEM_PROMPT: &str = "You are an expert culinary assistant. Your task is to produce a \
    search query description based on user input or preference.";

fn build_enhance_prompt(user_input: &str) -> String {
    format!(
        "You are an expert culinary assistant generating a search query that helps recommend a \
         variety of menu items based on user preferences.\n\n\
         User Input:\n\n{user_input}\n\n\
         Respond with just the key unique search terms for the user's preference; leave out \
         words that do not help search. If the user names dishes, you may add similar menu \
         items. If the user states preferences, expand them into key search terms. Build a \
         detailed query from specific information, or broaden a vague request so that similar \
         preferences are found."
    )
}

/// Rewrite a raw utterance into a search-oriented query, then normalize it
/// with [`clean_text`].
pub async fn enhance_query(model: &dyn LanguageModel, user_input: &str) -> Result<String> {
    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_enhance_prompt(user_input)),
    ];

    let raw = model
        .invoke(&messages)
        .await
        .context("Query enhancement failed")?;
    let cleaned = clean_text(&raw);
    tracing::info!("Query enhanced: {cleaned:?}");
    Ok(cleaned)
}

/// Strip `<...>` tags and ASCII punctuation, fold tabs/newlines and whitespace
/// runs into single spaces, trim, and lowercase.
///
/// Idempotent: the output contains no punctuation, so no tag can survive or
/// reappear on a second pass.
pub fn clean_text(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, "");
    let without_punct: String = without_tags
        .chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    without_punct
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl LanguageModel for Fixed {
        async fn invoke(&self, _messages: &[ChatMessage]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_clean_text_example() {
        assert_eq!(
            clean_text("<b>Spicy, Italian!</b>\nPlease"),
            "spicy italian please"
        );
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a\t\tb \n\n c  "), "a b c");
    }

    #[test]
    fn test_clean_text_removes_all_ascii_punctuation() {
        let cleaned = clean_text("pad-thai (extra) $12.50 @home #1 \"hot\" ~ok~");
        assert!(!cleaned.chars().any(|c| c.is_ascii_punctuation()));
        assert_eq!(cleaned, "padthai extra 1250 home 1 hot ok");
    }

    #[test]
    fn test_clean_text_tags_do_not_span_lines() {
        // `<` without a closing `>` on the same line is punctuation, not a tag
        assert_eq!(clean_text("a < b\nc > d"), "a b c d");
    }

    #[test]
    fn test_clean_text_keeps_unicode_letters() {
        assert_eq!(clean_text("Crème Brûlée!"), "crème brûlée");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let samples = [
            "",
            "   ",
            "<b>Spicy, Italian!</b>\nPlease",
            "<<nested>> tags <i>here</i>",
            "UPPER\tlower\nMiXeD",
            "Crème Brûlée, s'il vous plaît!",
            "a<b",
            "ÀÉÎ — “curly” quotes…",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_enhance_prompt_embeds_input() {
        let prompt = build_enhance_prompt("something cheesy");
        assert!(prompt.contains("something cheesy"));
    }

    #[tokio::test]
    async fn test_enhance_query_cleans_model_output() {
        let model = Fixed("<query>Spicy Noodles, Thai-style!</query>\n");
        let q = enhance_query(&model, "spicy noodles").await.unwrap();
        assert_eq!(q, "spicy noodles thaistyle");
    }
}
