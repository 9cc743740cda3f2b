//! Text-generation service access
//!
//! The pipeline talks to the generation capability only through the
//! [`Generator`] trait; [`OpenAiClient`] is the production implementation.

mod openai;
mod traits;

pub use openai::OpenAiClient;
pub use traits::*;
