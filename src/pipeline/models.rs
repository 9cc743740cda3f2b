//! Records produced by a pipeline run

use crate::search::LinkList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condensed content of one retrieved page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub url: String,
    pub text: String,
    /// 1-based position of `url` in the link list; the citation number
    pub result_number: usize,
}

/// A link that did not make it into the sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedSource {
    pub url: String,
    pub result_number: usize,
    pub reason: String,
}

/// Output of source collection
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub sources: Vec<SourceRecord>,
    pub dropped: Vec<DroppedSource>,
}

/// Wall-clock time spent in each stage, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub reformulate_ms: u64,
    pub search_ms: u64,
    pub collect_ms: u64,
    pub synthesize_ms: u64,
    pub total_ms: u64,
}

/// Everything a run produced, answer included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Research {
    pub question: String,
    pub search_query: String,
    pub links: LinkList,
    pub sources: Vec<SourceRecord>,
    pub dropped: Vec<DroppedSource>,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
    pub timings: StageTimings,
}
