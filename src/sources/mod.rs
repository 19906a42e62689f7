//! Research source plugins.
//!
//! A [`Source`] turns a [`SearchQuery`] into papers. [`ArxivSource`] is the
//! production implementation; [`MockSource`] returns scripted results so the
//! search service can be tested without the network.

mod arxiv;
pub mod mock;

pub use arxiv::ArxivSource;
pub use mock::MockSource;

use crate::models::{SearchQuery, SearchResponse};
use async_trait::async_trait;

/// The Source trait defines the interface for research source plugins.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for papers matching the query, in the source's own ranking order
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (Atom, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
