//! askweb: answers questions from live web search results
//!
//! A question is reformulated into a search query, the top results are
//! fetched and condensed, and a language model writes an answer citing them.

pub mod config;
pub mod engines;
pub mod error;
pub mod extract;
pub mod llm;
pub mod metrics;
pub mod network;
pub mod pipeline;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::PipelineError;
pub use pipeline::{Pipeline, Research};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of sources gathered per question unless configured otherwise
pub const DEFAULT_SOURCE_COUNT: usize = 5;

/// Upper bound on the characters kept from one page
pub const MAX_PAGE_CHARS: usize = 50_000;
