//! OpenAI-compatible chat completions client

use super::traits::{ChatMessage, CompletionRequest, Generator};
use crate::config::LlmSettings;
use crate::error::GenerationError;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for `POST {base_url}/chat/completions`
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(settings: &LlmSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .build()
            .context("Failed to create generation HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            temperature: settings.temperature,
        })
    }

    /// Resolve the chat completions endpoint from the base URL
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        }
    }

    /// The hosted OpenAI API refuses anonymous calls; local servers accept them
    fn requires_key(&self) -> bool {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.ends_with("openai.com")))
            .unwrap_or(false)
    }

    /// Whether requests can be authorized against the configured service
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() || !self.requires_key()
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        if self.api_key.is_none() && self.requires_key() {
            return Err(GenerationError::MissingApiKey);
        }

        let body = ChatRequestBody {
            model: &request.model,
            messages: &request.messages,
            temperature: self.temperature,
        };

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        debug!(
            "Generation request: model={} messages={}",
            request.model,
            request.messages.len()
        );

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        let parsed: ChatResponseBody = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
