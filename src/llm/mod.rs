//! Generative text providers.
//!
//! The [`TextGenerator`] trait is the seam between the note services and the
//! remote model. [`GeminiClient`] talks to the Gemini REST API;
//! [`MockGenerator`] records prompts and replays scripted replies in tests.

mod gemini;
pub mod mock;

pub use gemini::GeminiClient;
pub use mock::MockGenerator;

use async_trait::async_trait;

/// A text completion backend
#[async_trait]
pub trait TextGenerator: Send + Sync + std::fmt::Debug {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Generate a completion for a single-turn prompt
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// List model names available to the configured key
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Err(LlmError::NotImplemented)
    }
}

/// List the provider's models and keep those whose name contains the
/// configured model id. Used as a connectivity check at startup.
pub async fn matching_models(generator: &dyn TextGenerator) -> Result<Vec<String>, LlmError> {
    let wanted = generator.model();
    let models = generator.list_models().await?;
    Ok(models.into_iter().filter(|m| m.contains(wanted)).collect())
}

/// Errors that can occur when calling a text generator
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key was configured at startup
    #[error("API key is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from the provider
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider answered without any text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// The operation is not supported by this backend
    #[error("Operation not implemented for this provider")]
    NotImplemented,

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}
