//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::Paper;

/// Search query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Main search query string
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: 3,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

/// Search response from a source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Papers found, in the order the source ranked them
    pub papers: Vec<Paper>,

    /// Source name
    pub source: String,

    /// Query that produced these results
    pub query: String,
}

impl SearchResponse {
    pub fn new(papers: Vec<Paper>, source: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            papers,
            source: source.into(),
            query: query.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("graphene oxide").max_results(7);
        assert_eq!(query.query, "graphene oxide");
        assert_eq!(query.max_results, 7);
        assert_eq!(SearchQuery::default().max_results, 3);
    }
}
