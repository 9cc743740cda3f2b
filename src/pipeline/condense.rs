use super::prompts::CONDENSE_PROMPT;
use crate::error::GenerationError;
use crate::llm::{ChatMessage, CompletionRequest, Generator};
use std::sync::Arc;

/// Summarizes page text to roughly a hundred words
#[derive(Clone)]
pub struct TextCondenser {
    generator: Arc<dyn Generator>,
    model: String,
}

impl TextCondenser {
    pub fn new(generator: Arc<dyn Generator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub async fn condense(&self, text: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(&self.model)
            .message(ChatMessage::system(CONDENSE_PROMPT))
            .message(ChatMessage::user(text));

        let summary = self.generator.complete(request).await?;
        if summary.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::ScriptedGenerator;

    #[tokio::test]
    async fn test_condense_uses_summary_model() {
        let generator = Arc::new(ScriptedGenerator::new(|request| {
            assert_eq!(request.model, "gpt-3.5-turbo-16k");
            assert_eq!(request.system_prompt(), Some(CONDENSE_PROMPT));
            Ok(format!("summary of {} chars", request.last_user_message().unwrap_or("").len()))
        }));

        let summary = TextCondenser::new(generator, "gpt-3.5-turbo-16k")
            .condense("0123456789")
            .await
            .unwrap();
        assert_eq!(summary, "summary of 10 chars");
    }

    #[tokio::test]
    async fn test_empty_summary_is_error() {
        let generator = Arc::new(ScriptedGenerator::new(|_| Ok(String::new())));
        let err = TextCondenser::new(generator, "m")
            .condense("text")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }
}
