//! HTTP networking module
//!
//! Provides the HTTP client shared by the search engines and the page
//! extractor.

mod client;
mod request;
mod user_agent;

pub use client::HttpClient;
pub use request::{HttpMethod, HttpRequest, HttpResponse};
pub use user_agent::random_user_agent;
