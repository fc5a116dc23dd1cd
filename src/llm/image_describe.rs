use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::llm::LanguageModel;
use crate::models::{ChatMessage, ImageUpload};

const SYSTEM_PROMPT: &str = "You are an AI assistant specializing in analyzing and describing \
    food images. Your task is to provide a concise and accurate description of the food item.";

const DESCRIBE_PROMPT: &str = "Describe the dish in the image. Focus only on the food and its \
    ingredients; never mention plates, utensils, decorations or anything else that is not food.\n\n\
    Keep it to a short paragraph of key search terms that suggest what the user is looking for, \
    and leave out words that would not help a similarity search. Identify the dish (if unsure, \
    describe how it looks), name the cuisine and list the key ingredients.";

/// Check that an upload is well-formed base64. The bytes themselves are
/// passed through untouched.
pub fn validate_image(image: &ImageUpload) -> Result<()> {
    STANDARD
        .decode(image.data.trim())
        .map(|_| ())
        .context("Uploaded image is not valid base64")
}

/// Turn an uploaded dish photo into search-friendly text.
pub async fn describe_image(model: &dyn LanguageModel, image: &ImageUpload) -> Result<String> {
    validate_image(image)?;

    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user_with_image(DESCRIBE_PROMPT, image),
    ];

    let description = model
        .invoke(&messages)
        .await
        .context("Image description failed")?;
    tracing::info!("Image described in {} chars", description.len());
    Ok(description.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl LanguageModel for Recorder {
        async fn invoke(&self, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().extend(messages.iter().cloned());
            Ok("  Tonkotsu ramen, Japanese, pork broth  \n".into())
        }
    }

    fn upload(data: &str) -> ImageUpload {
        ImageUpload {
            media_type: "image/jpeg".into(),
            data: data.into(),
        }
    }

    #[test]
    fn test_validate_accepts_base64() {
        assert!(validate_image(&upload("aGVsbG8gd29ybGQ=")).is_ok());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(validate_image(&upload("not base64!!")).is_err());
    }

    #[tokio::test]
    async fn test_describe_sends_image_and_trims() {
        let model = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let text = describe_image(&model, &upload("aGVsbG8=")).await.unwrap();
        assert_eq!(text, "Tonkotsu ramen, Japanese, pork broth");

        let seen = model.seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].images(), vec!["aGVsbG8="]);
    }

    #[tokio::test]
    async fn test_describe_skips_model_on_bad_image() {
        let model = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        assert!(describe_image(&model, &upload("%%%")).await.is_err());
        assert!(model.seen.lock().is_empty());
    }
}
