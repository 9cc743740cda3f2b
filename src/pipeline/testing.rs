//! Stand-ins for the pipeline's external capabilities

use crate::error::{ExtractionError, FetchError, GenerationError, SearchError, SourceError};
use crate::extract::ContentExtractor;
use crate::llm::{CompletionRequest, Generator};
use crate::search::{LinkList, LinkRetriever};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Script = Box<dyn Fn(&CompletionRequest) -> Result<String, GenerationError> + Send + Sync>;

/// Answers every request with a closure and counts the calls
pub struct ScriptedGenerator {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, GenerationError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(&request)
    }
}

/// Returns canned links, or fails with the configured error
pub struct FixedRetriever {
    links: Option<Vec<String>>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FixedRetriever {
    pub fn links(links: &[&str]) -> Self {
        Self {
            links: Some(links.iter().map(|s| s.to_string()).collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            links: None,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LinkRetriever for FixedRetriever {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<LinkList, SearchError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), limit));
        match &self.links {
            Some(links) => {
                let links: Vec<String> = links.iter().take(limit).cloned().collect();
                Ok(LinkList::from(links))
            }
            None => Err(SearchError::Captcha {
                engine: "fixed".to_string(),
            }),
        }
    }
}

enum Page {
    Text(String),
    NotFound,
    Empty,
}

/// Serves page text from memory, optionally after a delay
#[derive(Default)]
pub struct MemoryExtractor {
    pages: HashMap<String, (Page, Duration)>,
}

impl MemoryExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, text: &str) -> Self {
        self.pages
            .insert(url.to_string(), (Page::Text(text.to_string()), Duration::ZERO));
        self
    }

    pub fn slow_page(mut self, url: &str, text: &str, delay: Duration) -> Self {
        self.pages
            .insert(url.to_string(), (Page::Text(text.to_string()), delay));
        self
    }

    pub fn missing(mut self, url: &str) -> Self {
        self.pages
            .insert(url.to_string(), (Page::NotFound, Duration::ZERO));
        self
    }

    pub fn empty(mut self, url: &str) -> Self {
        self.pages
            .insert(url.to_string(), (Page::Empty, Duration::ZERO));
        self
    }
}

#[async_trait]
impl ContentExtractor for MemoryExtractor {
    async fn extract(&self, url: &str) -> Result<String, SourceError> {
        let Some((page, delay)) = self.pages.get(url) else {
            return Err(FetchError::Timeout {
                url: url.to_string(),
            }
            .into());
        };
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        match page {
            Page::Text(text) => Ok(text.clone()),
            Page::NotFound => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }
            .into()),
            Page::Empty => Err(ExtractionError::NoContent {
                url: url.to_string(),
            }
            .into()),
        }
    }
}
