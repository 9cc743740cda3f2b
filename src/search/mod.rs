//! Search retrieval module
//!
//! Queries the configured engine and reduces its result links to a short,
//! host-unique, ranked list of sources.

mod links;
mod retriever;

pub use links::{hostname, LinkFilter, LinkList};
pub use retriever::{LinkRetriever, SearchRetriever};
