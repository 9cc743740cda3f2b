use super::prompts::SEARCH_QUERY_PROMPT;
use crate::error::GenerationError;
use crate::llm::{ChatMessage, CompletionRequest, Generator};
use std::sync::Arc;
use tracing::debug;

/// Turns a natural-language question into a search-engine query
#[derive(Clone)]
pub struct QueryReformulator {
    generator: Arc<dyn Generator>,
    model: String,
}

impl QueryReformulator {
    pub fn new(generator: Arc<dyn Generator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// The generated query is returned verbatim
    pub async fn reformulate(&self, question: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(&self.model)
            .message(ChatMessage::system(SEARCH_QUERY_PROMPT))
            .message(ChatMessage::user(question));

        let query = self.generator.complete(request).await?;
        if query.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!("Reformulated {:?} as {:?}", question, query);
        Ok(query)
    }
}
