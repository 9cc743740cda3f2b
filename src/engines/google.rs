//! Google search engine implementation

use super::traits::Engine;
use crate::network::HttpRequest;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Prefix of Google's redirect wrapper around result links
const REDIRECT_PREFIX: &str = "/url?";

/// Google web search, scraped from the plain HTML result page
pub struct Google {
    base_url: String,
}

impl Google {
    pub fn new() -> Self {
        Self::with_base_url("https://www.google.com/search")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Unwrap `/url?q=<target>&sa=...` into `<target>`
    fn unwrap_redirect(href: &str) -> Option<String> {
        let query = href.strip_prefix(REDIRECT_PREFIX)?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
            .filter(|target| target.starts_with("http://") || target.starts_with("https://"))
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn own_domains(&self) -> Vec<&str> {
        vec!["google"]
    }

    fn request(&self, query: &str) -> HttpRequest {
        HttpRequest::get(format!(
            "{}?q={}",
            self.base_url,
            urlencoding::encode(query)
        ))
    }

    fn parse_links(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&LINK_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(Self::unwrap_redirect)
            .collect()
    }
}
