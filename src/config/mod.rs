//! Configuration management.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `RESEARCH_NOTEBOOK` (nested keys use a
//! double underscore, e.g. `RESEARCH_NOTEBOOK_SERVER__PORT=9000`).
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [storage]
//! data_file = "research_data.json"
//!
//! [llm]
//! model = "gemini-2.5-flash"
//! response_language = "Japanese"
//!
//! [arxiv]
//! max_results = 3
//! ```
//!
//! The Gemini API key is normally supplied through `GEMINI_API_KEY`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "research-notebook.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Generative text provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// arXiv search settings
    #[serde(default)]
    pub arxiv: ArxivConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON document holding files and bookmarks
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("research_data.json")
}

/// Generative text provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; falls back to `GEMINI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier used for every request
    #[serde(default = "default_model")]
    pub model: String,

    /// REST base URL (without the `/models` suffix)
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Natural language the advice is written in
    #[serde(default = "default_response_language")]
    pub response_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_llm_base_url(),
            response_language: default_response_language(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_response_language() -> String {
    "Japanese".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

/// arXiv search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Query endpoint of the arXiv API
    #[serde(default = "default_arxiv_url")]
    pub base_url: String,

    /// Number of papers returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds
    #[serde(default = "default_arxiv_timeout")]
    pub timeout_secs: u64,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_url(),
            max_results: default_max_results(),
            timeout_secs: default_arxiv_timeout(),
        }
    }
}

fn default_arxiv_url() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_max_results() -> usize {
    3
}

fn default_arxiv_timeout() -> u64 {
    30
}

/// Load configuration from an optional file plus the environment.
///
/// A missing API key is not an error: the server starts and generation
/// requests fail individually.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
        .add_source(
            config::Environment::with_prefix("RESEARCH_NOTEBOOK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.llm.api_key = resolve_api_key(config.llm.api_key.take());
    Ok(config)
}

/// Find the default config file in the working directory
pub fn find_config_file() -> Option<PathBuf> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);
    path.is_file().then_some(path)
}

fn resolve_api_key(configured: Option<String>) -> Option<String> {
    configured
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
