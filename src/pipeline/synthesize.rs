use super::citations::rewrite_citations;
use super::models::SourceRecord;
use super::prompts::answer_prompt;
use crate::config::CitationStyle;
use crate::error::GenerationError;
use crate::llm::{ChatMessage, CompletionRequest, Generator};
use crate::search::LinkList;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Writes the cited answer from the collected sources
#[derive(Clone)]
pub struct AnswerSynthesizer {
    generator: Arc<dyn Generator>,
    model: String,
    style: CitationStyle,
}

impl AnswerSynthesizer {
    pub fn new(
        generator: Arc<dyn Generator>,
        model: impl Into<String>,
        style: CitationStyle,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            style,
        }
    }

    /// Ask for an answer grounded in `sources` and link its `[n]` markers to `links`
    pub async fn synthesize(
        &self,
        question: &str,
        sources: &[SourceRecord],
        links: &LinkList,
        now: DateTime<Utc>,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(&self.model)
            .message(ChatMessage::system(answer_prompt(&now)))
            .message(ChatMessage::user(serde_json::to_string(sources)?))
            .message(ChatMessage::user(question));

        let answer = self.generator.complete(request).await?;
        if answer.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(rewrite_citations(&answer, links, self.style))
    }
}
