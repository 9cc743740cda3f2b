//! Rewriting of bare `[n]` markers into linked citations

use crate::config::CitationStyle;
use crate::search::LinkList;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([1-9][0-9]*)\]").expect("valid regex"));

impl CitationStyle {
    /// Render citation `n` pointing at `url`
    pub fn render(self, n: usize, url: &str) -> String {
        match self {
            CitationStyle::Superscript => format!("<sup>[[{}]]({})</sup>", n, url),
            CitationStyle::Markdown => format!("[[{}]]({})", n, url),
        }
    }
}

/// Replace every `[n]` with `n` in `1..=links.len()` by a link to `links[n-1]`
///
/// Out-of-range numbers and anything that is not a plain bracketed integer
/// are left as written.
pub fn rewrite_citations(text: &str, links: &LinkList, style: CitationStyle) -> String {
    MARKER
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| links.url_for(n).map(|url| style.render(n, url)))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
