use std::sync::Arc;

use super::ServiceError;
use crate::llm::TextGenerator;
use crate::models::{PaperRecord, PaperSearchResponse, SearchQuery};
use crate::sources::Source;

/// Turns free text into a short English query and searches a paper source
#[derive(Debug, Clone)]
pub struct PaperSearcher {
    generator: Arc<dyn TextGenerator>,
    source: Arc<dyn Source>,
    max_results: usize,
}

impl PaperSearcher {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        source: Arc<dyn Source>,
        max_results: usize,
    ) -> Self {
        Self {
            generator,
            source,
            max_results,
        }
    }

    pub fn keyword_prompt(text: &str) -> String {
        format!(
            "Extract 2 simple English keywords for arXiv search from: {}. ONLY keywords separated by space.",
            text
        )
    }

    /// Remove quote characters and surrounding whitespace from a model reply.
    pub fn clean_query(raw: &str) -> String {
        raw.replace(&['"', '\''][..], "").trim().to_string()
    }

    /// Extract keywords from `text` and return the matching papers.
    pub async fn search(&self, text: &str) -> Result<Vec<PaperRecord>, ServiceError> {
        tracing::info!(source = self.source.id(), "Paper search started");

        let reply = self.generator.generate(&Self::keyword_prompt(text)).await?;
        let query = SearchQuery::new(Self::clean_query(&reply)).max_results(self.max_results);
        tracing::info!(query = %query.query, "Search keywords");

        let response = self.source.search(&query).await?;
        let papers: Vec<PaperRecord> = response.papers.iter().map(PaperRecord::from).collect();

        tracing::info!(count = papers.len(), source = %response.source, "Paper search complete");
        Ok(papers)
    }

    /// Like [`PaperSearcher::search`], with failures reported in the body.
    pub async fn respond(&self, text: &str) -> PaperSearchResponse {
        match self.search(text).await {
            Ok(papers) => PaperSearchResponse::found(papers),
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Paper search failed");
                PaperSearchResponse::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerator;
    use crate::sources::mock::make_paper;
    use crate::sources::MockSource;

    fn searcher(generator: Arc<MockGenerator>, source: Arc<MockSource>) -> PaperSearcher {
        PaperSearcher::new(generator, source, 3)
    }

    #[test]
    fn test_clean_query() {
        assert_eq!(PaperSearcher::clean_query("  \"graphene catalysis\"\n"), "graphene catalysis");
        assert_eq!(PaperSearcher::clean_query("'perovskite' 'stability'"), "perovskite stability");
        assert_eq!(PaperSearcher::clean_query("plain words"), "plain words");
    }

    #[test]
    fn test_clean_query_trims_after_removing_quotes() {
        assert_eq!(PaperSearcher::clean_query("' a b '"), "a b");
        assert_eq!(PaperSearcher::clean_query("\"  thin film  \""), "thin film");
    }

    #[tokio::test]
    async fn test_search_uses_cleaned_keywords() {
        let generator = Arc::new(MockGenerator::replying(" \"lithium anode\" \n"));
        let source = Arc::new(MockSource::new());
        source.set_papers(vec![
            make_paper("1", "One"),
            make_paper("2", "Two"),
            make_paper("3", "Three"),
            make_paper("4", "Four"),
        ]);

        let papers = searcher(generator.clone(), source.clone())
            .search("リチウム負極の劣化")
            .await
            .unwrap();

        assert_eq!(papers.len(), 3);
        assert_eq!(papers[0].title, "One");
        assert_eq!(papers[0].url, "http://example.com/pdf/1");

        let queries = source.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query, "lithium anode");
        assert_eq!(queries[0].max_results, 3);

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("リチウム負極の劣化"));
        assert!(prompt.contains("ONLY keywords separated by space"));
    }

    #[tokio::test]
    async fn test_generator_failure_skips_search() {
        let source = Arc::new(MockSource::new());
        let response = searcher(Arc::new(MockGenerator::failing("no key")), source.clone())
            .respond("text")
            .await;

        assert!(response.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(response.papers.is_empty());
        assert!(source.queries().is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_becomes_error_field() {
        let source = Arc::new(MockSource::new());
        source.fail_with("connection reset");
        let response = searcher(Arc::new(MockGenerator::replying("a b")), source)
            .respond("text")
            .await;

        assert!(response.error.unwrap().contains("connection reset"));
        assert!(response.papers.is_empty());
    }
}
