//! Engine trait for search providers

use crate::error::SearchError;
use crate::network::{HttpRequest, HttpResponse};

/// A search provider that can be queried for result links
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Hostname markers of the provider itself, never used as sources
    fn own_domains(&self) -> Vec<&str>;

    /// Build the HTTP request for a search
    fn request(&self, query: &str) -> HttpRequest;

    /// Parse the result page into target URLs, in document order
    fn parse_links(&self, html: &str) -> Vec<String>;

    /// Check the response and extract candidate links
    fn response(&self, response: HttpResponse) -> Result<Vec<String>, SearchError> {
        if response.is_rate_limited() {
            return Err(SearchError::RateLimited {
                engine: self.name().to_string(),
            });
        }

        if !response.is_success() {
            return Err(SearchError::Status {
                engine: self.name().to_string(),
                status: response.status,
            });
        }

        if let Some(content_type) = response.content_type() {
            if !content_type.contains("html") {
                return Err(SearchError::Unparsable {
                    engine: self.name().to_string(),
                    reason: format!("expected HTML, got {}", content_type),
                });
            }
        }

        let links = self.parse_links(&response.text);

        // Result pages can mention captchas; only a page without results is a bot check
        if links.is_empty() && response.is_captcha() {
            return Err(SearchError::Captcha {
                engine: self.name().to_string(),
            });
        }

        Ok(links)
    }
}
