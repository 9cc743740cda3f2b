//! The answer pipeline
//!
//! A run turns a question into a search query, retrieves ranked links,
//! condenses each linked page concurrently and asks the generation service
//! for an answer whose `[n]` markers are rewritten to link the n-th source.

mod citations;
mod collect;
mod condense;
mod models;
mod orchestrator;
mod prompts;
mod reformulate;
mod synthesize;

#[cfg(test)]
pub(crate) mod testing;

pub use citations::rewrite_citations;
pub use collect::SourceCollector;
pub use condense::TextCondenser;
pub use models::{Collected, DroppedSource, Research, SourceRecord, StageTimings};
pub use orchestrator::Pipeline;
pub use prompts::{answer_prompt, format_timestamp, CONDENSE_PROMPT, SEARCH_QUERY_PROMPT};
pub use reformulate::QueryReformulator;
pub use synthesize::AnswerSynthesizer;
