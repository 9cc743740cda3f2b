//! Concurrent extraction and condensation of the linked pages

use super::condense::TextCondenser;
use super::models::{Collected, DroppedSource, SourceRecord};
use crate::error::SourceError;
use crate::extract::ContentExtractor;
use crate::search::LinkList;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fans out over the link list and gathers condensed sources
///
/// Every URL is extracted then condensed independently. A URL that fails
/// either step is reported in [`Collected::dropped`] and the rest carry on.
/// Each surviving record keeps the 1-based position of its URL in the link
/// list as `result_number`, whatever order the work completed in.
pub struct SourceCollector {
    extractor: Arc<dyn ContentExtractor>,
    condenser: TextCondenser,
    max_concurrency: Option<usize>,
}

impl SourceCollector {
    pub fn new(
        extractor: Arc<dyn ContentExtractor>,
        condenser: TextCondenser,
        max_concurrency: Option<usize>,
    ) -> Self {
        Self {
            extractor,
            condenser,
            max_concurrency,
        }
    }

    pub async fn collect(&self, links: &LinkList) -> Collected {
        if links.is_empty() {
            return Collected::default();
        }

        let width = self
            .max_concurrency
            .map_or(links.len(), |cap| cap.min(links.len()))
            .max(1);
        debug!("Collecting {} sources, {} at a time", links.len(), width);

        let outcomes: Vec<(usize, String, Result<String, SourceError>)> =
            stream::iter(links.iter().cloned().enumerate())
                .map(|(i, url)| async move {
                    let outcome = self.source_text(&url).await;
                    (i + 1, url, outcome)
                })
                .buffered(width)
                .collect()
                .await;

        let mut collected = Collected::default();
        for (result_number, url, outcome) in outcomes {
            match outcome {
                Ok(text) => collected.sources.push(SourceRecord {
                    url,
                    text,
                    result_number,
                }),
                Err(e) => {
                    warn!("Dropping source [{}] {}: {}", result_number, url, e);
                    collected.dropped.push(DroppedSource {
                        url,
                        result_number,
                        reason: e.to_string(),
                    });
                }
            }
        }
        collected
    }

    async fn source_text(&self, url: &str) -> Result<String, SourceError> {
        let text = self.extractor.extract(url).await?;
        self.condenser
            .condense(&text)
            .await
            .map_err(SourceError::Condense)
    }
}
