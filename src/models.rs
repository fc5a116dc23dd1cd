use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ─── Model messages ──────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One piece of a message body: plain text or an inline base64 image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { media_type: String, data: String },
}

/// A role-tagged message sent to the language model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![ContentPart::Text { text: text.into() }],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    /// User message carrying a text part followed by an image part.
    pub fn user_with_image(text: impl Into<String>, image: &ImageUpload) -> Self {
        Self {
            role: Role::User,
            parts: vec![
                ContentPart::Text { text: text.into() },
                ContentPart::Image {
                    media_type: image.media_type.clone(),
                    data: image.data.clone(),
                },
            ],
        }
    }

    /// All text parts joined with newlines.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Base64 payloads of all image parts, in order.
    pub fn images(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Image { data, .. } => Some(data.as_str()),
                ContentPart::Text { .. } => None,
            })
            .collect()
    }
}

// ─── Menu corpus ─────────────────────────────────────────

/// Structured fields attached to every indexed dish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishMetadata {
    /// Path of the dish photo, relative to the asset root
    pub image_path: String,
    #[serde(default)]
    pub menu_item_name: Option<String>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub average_rating: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub calories: Option<Value>,
    #[serde(default)]
    pub serves: Option<Value>,
    /// Any other keys carried by the index
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A candidate dish returned by the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub page_content: String,
    pub metadata: DishMetadata,
}

// ─── Recommendations and turns ───────────────────────────

/// An accepted dish: its persuasive summary plus the metadata it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub summary: String,
    pub image_path: String,
    pub metadata: DishMetadata,
}

/// Accepted dishes in acceptance order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationList {
    pub items: Vec<Recommendation>,
}

impl RecommendationList {
    pub fn push(&mut self, summary: String, metadata: DishMetadata) {
        self.items.push(Recommendation {
            summary,
            image_path: metadata.image_path.clone(),
            metadata,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summaries(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|r| r.summary.as_str())
    }

    /// Image paths in the same order as [`Self::summaries`].
    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|r| r.image_path.as_str())
    }
}

/// What the assistant showed for a turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum AssistantReply {
    Recommendations(RecommendationList),
    Message(String),
}

/// A completed exchange. Appended once per turn, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// What the user typed, or a placeholder for image-only turns
    pub user_text: String,
    pub reply: AssistantReply,
    /// Assistant text fed back as conversation memory on later turns
    pub memory_text: String,
}

impl ChatTurn {
    pub fn new(user_text: String, reply: AssistantReply, memory_text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_text,
            reply,
            memory_text,
        }
    }
}

// ─── HTTP bodies ─────────────────────────────────────────

/// A base64-encoded image attached to a chat submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUpload {
    #[serde(default = "default_media_type")]
    pub media_type: String,
    pub data: String,
}

fn default_media_type() -> String {
    "image/jpeg".to_string()
}

/// Chat request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub image: Option<ImageUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(path: &str) -> DishMetadata {
        DishMetadata {
            image_path: path.to_string(),
            menu_item_name: None,
            restaurant_name: None,
            average_rating: None,
            price: None,
            calories: None,
            serves: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_metadata_keeps_unknown_keys() {
        let json = r#"{"image_path":"img/1.jpg","price":12.5,"cuisine":"thai"}"#;
        let meta: DishMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.image_path, "img/1.jpg");
        assert_eq!(meta.price, Some(serde_json::json!(12.5)));
        assert_eq!(meta.extra.get("cuisine"), Some(&serde_json::json!("thai")));
    }

    #[test]
    fn test_metadata_requires_image_path() {
        let json = r#"{"menu_item_name":"Pad Thai"}"#;
        assert!(serde_json::from_str::<DishMetadata>(json).is_err());
    }

    #[test]
    fn test_recommendation_list_keeps_pairs_aligned() {
        let mut list = RecommendationList::default();
        list.push("first".into(), metadata("a.jpg"));
        list.push("second".into(), metadata("b.jpg"));
        let summaries: Vec<_> = list.summaries().collect();
        let paths: Vec<_> = list.image_paths().collect();
        assert_eq!(summaries, vec!["first", "second"]);
        assert_eq!(paths, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_reply_serializes_with_kind_tag() {
        let json = serde_json::to_value(AssistantReply::Message("hi".into())).unwrap();
        assert_eq!(json["kind"], "message");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_message_text_and_images() {
        let image = ImageUpload {
            media_type: "image/png".into(),
            data: "aGVsbG8=".into(),
        };
        let msg = ChatMessage::user_with_image("describe", &image);
        assert_eq!(msg.text_content(), "describe");
        assert_eq!(msg.images(), vec!["aGVsbG8="]);
    }

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str(r#"{"image":{"data":"abc"}}"#).unwrap();
        assert!(req.message.is_empty());
        assert_eq!(req.image.unwrap().media_type, "image/jpeg");
    }
}
