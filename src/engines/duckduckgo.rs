//! DuckDuckGo search engine implementation

use super::traits::Engine;
use crate::network::HttpRequest;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static RESULT_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result a.result__a").expect("valid selector"));

/// DuckDuckGo HTML (no-JavaScript) web search
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_base_url("https://html.duckduckgo.com/html/")
    }

    pub fn with_base_url(html_url: impl Into<String>) -> Self {
        Self {
            html_url: html_url.into(),
        }
    }

    /// Resolve `//duckduckgo.com/l/?uddg=<target>&rut=...` to `<target>`
    fn resolve_href(href: &str) -> Option<String> {
        if let Some(pos) = href.find("uddg=") {
            let query = &href[pos..];
            return url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned());
        }

        if href.starts_with("http://") || href.starts_with("https://") {
            Some(href.to_string())
        } else {
            None
        }
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn own_domains(&self) -> Vec<&str> {
        vec!["duckduckgo"]
    }

    fn request(&self, query: &str) -> HttpRequest {
        HttpRequest::post(&self.html_url)
            .form_field("q", query)
            .form_field("b", "")
            .form_field("kl", "us-en")
    }

    fn parse_links(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&RESULT_LINK_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(Self::resolve_href)
            .collect()
    }
}
