//! Metrics collection module
//!
//! Tracks pipeline runs, failures by stage, source yield and stage latency.

use crate::pipeline::{Research, StageTimings};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of recent durations kept per stage
const WINDOW: usize = 100;

const STAGES: [&str; 5] = ["reformulate", "search", "collect", "synthesize", "total"];

/// Process-wide pipeline metrics
pub struct Metrics {
    runs: AtomicU64,
    successes: AtomicU64,
    sources_retrieved: AtomicU64,
    sources_kept: AtomicU64,
    /// Failure counts keyed by stage name
    failures: RwLock<HashMap<String, u64>>,
    /// Recent durations in ms keyed by stage name
    durations: RwLock<HashMap<String, VecDeque<u64>>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            sources_retrieved: AtomicU64::new(0),
            sources_kept: AtomicU64::new(0),
            failures: RwLock::new(HashMap::new()),
            durations: RwLock::new(HashMap::new()),
        }
    }

    /// Count a run as started
    pub fn inc_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed run
    pub fn record_success(&self, research: &Research) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.sources_retrieved
            .fetch_add(research.links.len() as u64, Ordering::Relaxed);
        self.sources_kept
            .fetch_add(research.sources.len() as u64, Ordering::Relaxed);
        self.record_timings(&research.timings);
    }

    /// Record a run that failed in `stage`
    pub fn record_failure(&self, stage: &str) {
        let mut failures = self.failures.write().unwrap_or_else(PoisonError::into_inner);
        *failures.entry(stage.to_string()).or_insert(0) += 1;
    }

    fn record_timings(&self, timings: &StageTimings) {
        let values = [
            timings.reformulate_ms,
            timings.search_ms,
            timings.collect_ms,
            timings.synthesize_ms,
            timings.total_ms,
        ];
        let mut durations = self.durations.write().unwrap_or_else(PoisonError::into_inner);
        for (stage, ms) in STAGES.iter().zip(values) {
            let window = durations.entry(stage.to_string()).or_default();
            if window.len() >= WINDOW {
                window.pop_front();
            }
            window.push_back(ms);
        }
    }

    /// Average of the recent durations for `stage`
    pub fn avg_duration(&self, stage: &str) -> Option<u64> {
        let durations = self.durations.read().unwrap_or_else(PoisonError::into_inner);
        durations
            .get(stage)
            .filter(|w| !w.is_empty())
            .map(|w| w.iter().sum::<u64>() / w.len() as u64)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let failures = self
            .failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let avg_stage_ms = STAGES
            .iter()
            .filter_map(|stage| self.avg_duration(stage).map(|ms| (stage.to_string(), ms)))
            .collect();

        MetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures,
            sources_retrieved: self.sources_retrieved.load(Ordering::Relaxed),
            sources_kept: self.sources_kept.load(Ordering::Relaxed),
            avg_stage_ms,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of [`Metrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub runs: u64,
    pub successes: u64,
    pub failures: HashMap<String, u64>,
    pub sources_retrieved: u64,
    pub sources_kept: u64,
    pub avg_stage_ms: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SourceRecord;
    use crate::search::LinkList;
    use chrono::Utc;

    fn research(total_ms: u64, links: usize, kept: usize) -> Research {
        Research {
            question: "q".to_string(),
            search_query: "q".to_string(),
            links: LinkList::from(
                (0..links)
                    .map(|i| format!("https://s{}.example/", i))
                    .collect::<Vec<_>>(),
            ),
            sources: (0..kept)
                .map(|i| SourceRecord {
                    url: format!("https://s{}.example/", i),
                    text: "t".to_string(),
                    result_number: i + 1,
                })
                .collect(),
            dropped: Vec::new(),
            answer: "a".to_string(),
            timestamp: Utc::now(),
            timings: StageTimings {
                total_ms,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_run();
        metrics.record_success(&research(100, 5, 3));
        metrics.inc_run();
        metrics.record_success(&research(300, 4, 4));
        metrics.inc_run();
        metrics.record_failure("search");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.runs, 3);
        assert_eq!(snapshot.successes, 2);
        assert_eq!(snapshot.failures.get("search"), Some(&1));
        assert_eq!(snapshot.sources_retrieved, 9);
        assert_eq!(snapshot.sources_kept, 7);
        assert_eq!(snapshot.avg_stage_ms.get("total"), Some(&200));
        assert_eq!(metrics.avg_duration("unknown"), None);
    }

    #[test]
    fn test_duration_window_is_bounded() {
        let metrics = Metrics::new();
        for _ in 0..WINDOW {
            metrics.record_success(&research(1_000, 0, 0));
        }
        for _ in 0..WINDOW {
            metrics.record_success(&research(10, 0, 0));
        }
        assert_eq!(metrics.avg_duration("total"), Some(10));
    }
}
