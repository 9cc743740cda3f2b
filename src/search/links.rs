//! Link filtering: exact dedup, denylist, one result per host

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// Ordered, host-unique list of source URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkList(Vec<String>);

impl LinkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// URL cited by result number `n` (1-based)
    pub fn url_for(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
    }
}

impl From<Vec<String>> for LinkList {
    /// Wrap URLs as-is; use [`LinkFilter`] to enforce the list invariants
    fn from(urls: Vec<String>) -> Self {
        Self(urls)
    }
}

impl<'a> IntoIterator for &'a LinkList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Reduces raw result links to a [`LinkList`]
#[derive(Debug, Clone)]
pub struct LinkFilter {
    denylist: Vec<String>,
}

impl LinkFilter {
    pub fn new<I, S>(denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denylist: denylist
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Filter candidates in rank order and keep at most `limit`
    pub fn apply<I>(&self, candidates: I, limit: usize) -> LinkList
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen_urls = HashSet::new();
        let mut seen_hosts = HashSet::new();
        let mut accepted = Vec::new();

        for link in candidates {
            if accepted.len() >= limit {
                break;
            }

            if !seen_urls.insert(link.clone()) {
                continue;
            }

            let host = match hostname(&link) {
                Some(h) => h,
                None => continue,
            };

            if self.is_denied(&host) {
                continue;
            }

            if seen_hosts.insert(host) {
                accepted.push(link);
            }
        }

        LinkList(accepted)
    }

    fn is_denied(&self, host: &str) -> bool {
        self.denylist.iter().any(|d| host.contains(d.as_str()))
    }
}

/// Lowercase hostname of a URL, if it has one
pub fn hostname(link: &str) -> Option<String> {
    Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .filter(|h| !h.is_empty())
}
