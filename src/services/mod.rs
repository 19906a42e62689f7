//! Note services sitting between the HTTP layer and the providers.
//!
//! - [`AdviceGenerator`]: advice on a note, grounded in bookmarked papers
//! - [`PaperSearcher`]: keyword extraction followed by an arXiv search
//!
//! Both expose a typed `Result` API and a `respond` method that folds
//! failures into the response body the frontend expects.

mod advisor;
mod paper_search;

pub use advisor::AdviceGenerator;
pub use paper_search::PaperSearcher;

use crate::llm::LlmError;
use crate::sources::SourceError;

/// A provider failure seen by a service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The text generator failed
    #[error("{0}")]
    Generation(#[from] LlmError),

    /// The paper source failed
    #[error("{0}")]
    Search(#[from] SourceError),
}

impl ServiceError {
    /// Short machine-readable category, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Generation(_) => "generation",
            ServiceError::Search(_) => "search",
        }
    }
}
