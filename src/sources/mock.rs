//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{Paper, PaperBuilder, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};

/// A mock source for testing that returns predefined responses.
#[derive(Debug, Default)]
pub struct MockSource {
    papers: Mutex<Vec<Paper>>,
    failure: Mutex<Option<String>>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the papers every search returns (truncated to `max_results`).
    pub fn set_papers(&self, papers: Vec<Paper>) {
        *self.papers.lock().unwrap() = papers;
    }

    /// Make every search fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SourceError::Network(message));
        }
        let papers = self
            .papers
            .lock()
            .unwrap()
            .iter()
            .take(query.max_results)
            .cloned()
            .collect();
        Ok(SearchResponse::new(papers, self.name(), &query.query))
    }
}

/// Helper function to create a mock paper for testing.
pub fn make_paper(paper_id: &str, title: &str) -> Paper {
    PaperBuilder::new(
        paper_id,
        title,
        format!("http://example.com/abs/{}", paper_id),
    )
    .abstract_text(format!("Abstract of {}", title))
    .pdf_url(format!("http://example.com/pdf/{}", paper_id))
    .build()
}
