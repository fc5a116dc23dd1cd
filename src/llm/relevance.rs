use anyhow::{Context, Result};
use serde::Serialize;

use crate::llm::LanguageModel;
use crate::models::ChatMessage;

const SYSTEM_PROMPT: &str = "You are a restaurant assistant specializing in helping customers \
    find the food they want.";

/// Outcome of the per-dish relevance gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Relevant,
    NotRelevant,
}

impl Relevance {
    /// Only an exact "yes" (case-insensitive, surrounding whitespace ignored)
    /// counts as relevant. Anything else, including "Yes." or a sentence that
    /// starts with yes, is a rejection.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("yes") {
            Relevance::Relevant
        } else {
            Relevance::NotRelevant
        }
    }

    pub fn is_relevant(self) -> bool {
        self == Relevance::Relevant
    }
}

/// Build the yes/no question for a single dish.
fn build_yesno_prompt(dish_description: &str, preference: &str) -> String {
    format!(
        "Answer the question \"Is this dish relevant to the user by comparing dish details and \
         user preference?\" in one word, either Yes or No, based only on the following context. \
         Say Yes only if it is relevant, otherwise say No.\n\
         Context:\n{dish_description}\n\
         User Preference: {preference}\n\
         Answer:"
    )
}

/// Ask the model whether one dish matches the user's stated preference.
pub async fn check_relevance(
    model: &dyn LanguageModel,
    dish_description: &str,
    preference: &str,
) -> Result<Relevance> {
    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_yesno_prompt(dish_description, preference)),
    ];

    let answer = model
        .invoke(&messages)
        .await
        .context("Relevance check failed")?;
    let verdict = Relevance::from_answer(&answer);
    tracing::debug!("Relevance answer {answer:?} -> {verdict:?}");
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_yes_variants() {
        assert_eq!(Relevance::from_answer("yes"), Relevance::Relevant);
        assert_eq!(Relevance::from_answer("Yes"), Relevance::Relevant);
        assert_eq!(Relevance::from_answer("  YES \n"), Relevance::Relevant);
    }

    #[test]
    fn test_no_is_not_relevant() {
        assert_eq!(Relevance::from_answer("No"), Relevance::NotRelevant);
        assert_eq!(Relevance::from_answer("no"), Relevance::NotRelevant);
    }

    #[test]
    fn test_ambiguous_answers_are_rejected() {
        assert_eq!(Relevance::from_answer("Yes."), Relevance::NotRelevant);
        assert_eq!(
            Relevance::from_answer("Yes, this dish is spicy"),
            Relevance::NotRelevant
        );
        assert_eq!(Relevance::from_answer("maybe"), Relevance::NotRelevant);
        assert_eq!(Relevance::from_answer(""), Relevance::NotRelevant);
    }

    #[test]
    fn test_prompt_contains_dish_and_preference() {
        let prompt = build_yesno_prompt("Margherita pizza with basil", "something italian");
        assert!(prompt.contains("Margherita pizza with basil"));
        assert!(prompt.contains("User Preference: something italian"));
        assert!(prompt.ends_with("Answer:"));
    }
}
