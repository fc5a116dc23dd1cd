use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::llm::LanguageModel;
use crate::models::{ChatMessage, Document};
use crate::session::MemoryPair;

const SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable assistant capable of providing \
    food recommendations and answering general queries.";

/// Whether the assistant wants the recommendation cards shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Recommend,
    Converse,
}

impl Decision {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == "yes" => Decision::Recommend,
            _ => Decision::Converse,
        }
    }
}

/// The assistant's `{"recommendation", "response"}` reply, parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantEnvelope {
    pub decision: Decision,
    pub response: String,
}

impl AssistantEnvelope {
    /// Envelope used when the model did not return a JSON object: converse,
    /// and show the raw text as the reply.
    pub fn fallback(raw: &str) -> Self {
        Self {
            decision: Decision::Converse,
            response: raw.to_string(),
        }
    }

    /// Strict JSON decode of the model output. Missing fields default to
    /// "no" and an empty response; anything that is not a JSON object falls
    /// back to [`Self::fallback`].
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => {
                let response = match map.get("response") {
                    Some(Value::String(s)) => s.clone(),
                    None | Some(Value::Null) => String::new(),
                    Some(other) => other.to_string(),
                };
                Self {
                    decision: Decision::from_field(map.get("recommendation")),
                    response,
                }
            }
            Ok(_) => {
                tracing::warn!("Assistant returned JSON that is not an object, treating as text");
                Self::fallback(raw)
            }
            Err(e) => {
                tracing::warn!("Assistant returned malformed JSON ({e}), treating as text");
                Self::fallback(raw)
            }
        }
    }
}

/// Concatenate candidate texts, each followed by a blank line.
pub fn build_context(documents: &[Document]) -> String {
    let mut ctx = String::new();
    for doc in documents {
        ctx.push_str(&doc.page_content);
        ctx.push_str("\n\n");
    }
    ctx
}

fn build_task_prompt(user_input: &str, context: &str) -> String {
    format!(
        "Your task is to engage users in natural, friendly dialogue to understand their \
         preferences, dietary restrictions, and culinary interests.\n\
         If the user is asking for a recommendation, summarize relevant food recommendations \
         in a single sentence based on the user's input and the context. Otherwise ask the user \
         which cuisine or dish they would like, based on the context given. Do not answer if you \
         have no relevant knowledge about the query.\n\n\
         Remember the context given is all the dishes we have.\n\
         User Input:\n{user_input}\n\n\
         Context:\n{context}\n\
         The output should be strictly formatted in JSON, with the following structure:\n\
         \"recommendation\": A field indicating whether a recommendation was made (\"yes\" or \"no\").\n\
         \"response\": A text field containing the chatbot's conversational response to the user's \
         input, including recommendations or additional questions if necessary.\n"
    )
}

/// System prompt, then the memory window as alternating user/assistant
/// messages (oldest first), then the task for this turn.
fn build_messages(
    context: &str,
    user_input: &str,
    memory: &[MemoryPair],
    window: usize,
) -> Vec<ChatMessage> {
    let start = memory.len().saturating_sub(window);
    let recent = &memory[start..];

    let mut messages = Vec::with_capacity(recent.len() * 2 + 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    for pair in recent {
        messages.push(ChatMessage::user(pair.user.clone()));
        messages.push(ChatMessage::assistant(pair.assistant.clone()));
    }
    messages.push(ChatMessage::user(build_task_prompt(user_input, context)));
    messages
}

/// Let the model decide between recommending and conversing.
pub async fn decide(
    model: &dyn LanguageModel,
    context: &str,
    user_input: &str,
    memory: &[MemoryPair],
    window: usize,
) -> Result<AssistantEnvelope> {
    let messages = build_messages(context, user_input, memory, window);
    let raw = model
        .invoke(&messages)
        .await
        .context("Assistant call failed")?;
    let envelope = AssistantEnvelope::parse(&raw);
    tracing::info!("Assistant decision: {:?}", envelope.decision);
    Ok(envelope)
}
