//! Error types for the answer pipeline
//!
//! Per-source failures (`FetchError`, `ExtractionError`, condensation
//! failures) are recovered inside the collector. `SearchError` and
//! generation failures during reformulation or synthesis end the run and
//! surface as a `PipelineError` naming the failed stage.

use thiserror::Error;

/// Failure talking to the text-generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation response could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("generation service returned an empty response")]
    EmptyResponse,

    #[error("no API key configured for the generation service")]
    MissingApiKey,
}

/// The search provider could not produce a result page
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{engine}: request failed: {source}")]
    Request {
        engine: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{engine}: timed out after {seconds}s")]
    Timeout { engine: String, seconds: f64 },

    #[error("{engine}: HTTP {status}")]
    Status { engine: String, status: u16 },

    #[error("{engine}: rate limited")]
    RateLimited { engine: String },

    #[error("{engine}: CAPTCHA or bot check page returned")]
    Captcha { engine: String },

    #[error("{engine}: unparsable result page: {reason}")]
    Unparsable { engine: String, reason: String },
}

/// A page could not be downloaded
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetching {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// A page was downloaded but no readable content came out of it
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no readable content found in {url}")]
    NoContent { url: String },

    #[error("{url} has unsupported content type {content_type}")]
    UnsupportedContentType { url: String, content_type: String },
}

/// Why a single source was left out of the collected set
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("condensing failed: {0}")]
    Condense(#[source] GenerationError),
}

/// Fatal failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("query reformulation failed: {0}")]
    Reformulation(#[source] GenerationError),

    #[error("search unavailable: {0}")]
    Search(#[from] SearchError),

    #[error("answer synthesis failed: {0}")]
    Synthesis(#[source] GenerationError),
}

impl PipelineError {
    /// Name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::EmptyQuestion => "input",
            PipelineError::Reformulation(_) => "reformulate",
            PipelineError::Search(_) => "search",
            PipelineError::Synthesis(_) => "synthesize",
        }
    }
}
