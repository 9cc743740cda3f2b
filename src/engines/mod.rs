//! Search engine module
//!
//! Defines the Engine trait and the providers the retriever can query.

mod loader;
mod traits;

pub mod duckduckgo;
pub mod google;

pub use loader::EngineLoader;
pub use traits::*;
