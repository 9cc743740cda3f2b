//! HTTP API
//!
//! Exposes the pipeline as JSON endpoints for use as a service.

mod handlers;
mod routes;
mod state;

pub use handlers::{AskParams, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
