//! Settings structures for askweb configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub extract: ExtractSettings,
    pub collect: CollectSettings,
    pub answer: AnswerSettings,
    pub outgoing: OutgoingSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (ASKWEB_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ASKWEB_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("ASKWEB_LLM_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Some(val) = var("ASKWEB_API_KEY").or_else(|| var("OPENAI_API_KEY")) {
            if !val.trim().is_empty() {
                self.llm.api_key = Some(val);
            }
        }
        if let Some(val) = var("ASKWEB_ENGINE") {
            self.search.engine = val;
        }
        if let Some(val) = var("ASKWEB_SOURCE_COUNT") {
            if let Ok(count) = val.parse() {
                self.search.source_count = count;
            }
        }
        if let Some(val) = var("ASKWEB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("ASKWEB_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.search.source_count == 0 {
            bail!("search.source_count must be at least 1");
        }
        if !crate::engines::EngineLoader::available_engines().contains(&self.search.engine.as_str())
        {
            bail!("unknown search engine: {}", self.search.engine);
        }
        for (name, model) in [
            ("llm.query_model", &self.llm.query_model),
            ("llm.summary_model", &self.llm.summary_model),
            ("llm.answer_model", &self.llm.answer_model),
        ] {
            if model.trim().is_empty() {
                bail!("{} must not be empty", name);
            }
        }
        for (name, seconds) in [
            ("llm.request_timeout", self.llm.request_timeout),
            ("search.timeout", self.search.timeout),
            ("outgoing.request_timeout", self.outgoing.request_timeout),
        ] {
            if !(seconds.is_finite() && seconds > 0.0) {
                bail!("{} must be positive", name);
            }
        }
        if self.extract.max_chars == 0 {
            bail!("extract.max_chars must be at least 1");
        }
        if self.collect.max_concurrency == Some(0) {
            bail!("collect.max_concurrency must be at least 1 when set");
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// Bearer key for the API
    pub api_key: Option<String>,
    /// Model used to turn the question into a search query
    pub query_model: String,
    /// Model used to condense page text
    pub summary_model: String,
    /// Model used to write the final answer
    pub answer_model: String,
    /// Sampling temperature, service default when unset
    pub temperature: Option<f32>,
    /// Timeout for one generation call in seconds
    pub request_timeout: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            query_model: "gpt-3.5-turbo".to_string(),
            summary_model: "gpt-3.5-turbo-16k".to_string(),
            answer_model: "gpt-3.5-turbo".to_string(),
            temperature: None,
            request_timeout: 120.0,
        }
    }
}

/// Search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engine name (google, duckduckgo)
    pub engine: String,
    /// Override of the engine's endpoint
    pub base_url: Option<String>,
    /// Maximum number of sources to retrieve
    pub source_count: usize,
    /// Hostname substrings never used as sources
    pub denylist: Vec<String>,
    /// Timeout for the search request in seconds
    pub timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engine: "google".to_string(),
            base_url: None,
            source_count: crate::DEFAULT_SOURCE_COUNT,
            denylist: default_denylist(),
            timeout: 10.0,
        }
    }
}

/// Page extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Maximum characters of page text handed to the condenser
    pub max_chars: usize,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            max_chars: crate::MAX_PAGE_CHARS,
        }
    }
}

/// Source collection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectSettings {
    /// Cap on concurrent fetches (one per source when unset)
    pub max_concurrency: Option<usize>,
}

/// Answer rendering settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    pub citation_style: CitationStyle,
}

/// How `[n]` markers are rendered in the answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationStyle {
    /// `<sup>[[n]](url)</sup>`
    #[default]
    Superscript,
    /// `[[n]](url)`
    Markdown,
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Appended to the generated user agent
    pub useragent_suffix: Option<String>,
    /// Max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            useragent_suffix: None,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// HTTP API server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

fn default_denylist() -> Vec<String> {
    ["google", "facebook", "twitter", "instagram", "youtube", "tiktok"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
