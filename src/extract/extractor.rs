//! Page fetching and readable-text extraction

use super::{readability, text};
use crate::config::ExtractSettings;
use crate::error::{ExtractionError, FetchError, SourceError};
use crate::network::{HttpClient, HttpResponse};
use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

/// Something that turns a URL into readable page text
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, SourceError>;
}

/// Fetches pages over HTTP and keeps their main content
pub struct PageExtractor {
    client: HttpClient,
    max_chars: usize,
}

impl PageExtractor {
    pub fn new(client: HttpClient, settings: &ExtractSettings) -> Self {
        Self {
            client,
            max_chars: settings.max_chars,
        }
    }

    /// Turn a fetched response into bounded plain text
    pub fn extract_text(
        &self,
        url: &str,
        response: &HttpResponse,
    ) -> Result<String, ExtractionError> {
        let content_type = response.content_type();

        let text = match content_type.as_deref() {
            None => from_html(&response.text),
            Some(ct) if ct.contains("html") => from_html(&response.text),
            Some("text/plain") => Some(text::normalize_whitespace(&response.text)),
            Some(other) => {
                return Err(ExtractionError::UnsupportedContentType {
                    url: url.to_string(),
                    content_type: other.to_string(),
                })
            }
        };

        match text {
            Some(t) if !t.is_empty() => Ok(text::truncate_chars(&t, self.max_chars).to_string()),
            _ => Err(ExtractionError::NoContent {
                url: url.to_string(),
            }),
        }
    }
}

fn from_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    readability::main_content(&document).map(|elements| text::render(&elements))
}

#[async_trait]
impl ContentExtractor for PageExtractor {
    async fn extract(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            }
            .into());
        }

        let text = self.extract_text(url, &response)?;
        debug!("Extracted {} characters from {}", text.chars().count(), url);
        Ok(text)
    }
}
