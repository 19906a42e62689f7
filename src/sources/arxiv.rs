//! arXiv research source implementation.

use async_trait::async_trait;
use feed_rs::parser;
use std::time::Duration;

use crate::config::ArxivConfig;
use crate::models::{Paper, PaperBuilder, SearchQuery, SearchResponse};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// Base URL for arXiv PDFs
const ARXIV_PDF_URL: &str = "https://arxiv.org/pdf";
/// arXiv rejects pages larger than this
const ARXIV_MAX_PAGE: usize = 2000;

/// arXiv research source
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: HttpClient,
    base_url: String,
}

impl ArxivSource {
    pub fn from_config(config: &ArxivConfig) -> Result<Self, SourceError> {
        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the query URL. The text is sent as-is so arXiv applies its own
    /// field defaults; results come back in relevance order.
    fn build_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=relevance&sortOrder=descending",
            self.base_url,
            urlencoding::encode(&query.query),
            query.max_results.min(ARXIV_MAX_PAGE)
        )
    }

    /// Parse arXiv Atom feed entry into Paper
    fn parse_entry(entry: &feed_rs::model::Entry) -> Result<Paper, SourceError> {
        // arXiv reports query errors as a single entry under /api/errors
        if entry.id.contains("/api/errors") {
            let message = entry
                .summary
                .as_ref()
                .map(|s| s.content.trim().to_string())
                .unwrap_or_else(|| entry.id.clone());
            return Err(SourceError::Api(message));
        }

        let paper_id = entry
            .id
            .rsplit("/abs/")
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SourceError::Parse("Missing paper ID".to_string()))?
            .to_string();

        let title = entry
            .title
            .as_ref()
            .map(|t| collapse_whitespace(&t.content))
            .unwrap_or_default();

        let abstract_text = entry
            .summary
            .as_ref()
            .map(|s| s.content.as_str())
            .unwrap_or("");

        let pdf_url = entry
            .links
            .iter()
            .find(|l| {
                l.media_type.as_deref() == Some("application/pdf")
                    || l.title.as_deref() == Some("pdf")
            })
            .map(|l| l.href.clone())
            .unwrap_or_else(|| format!("{}/{}", ARXIV_PDF_URL, paper_id));

        let mut builder = PaperBuilder::new(paper_id, title, entry.id.clone())
            .abstract_text(abstract_text)
            .pdf_url(pdf_url);
        if let Some(published) = entry.published {
            builder = builder.published(published);
        }
        Ok(builder.build())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SourceError> {
        let url = self.build_url(query);
        tracing::debug!(%url, "Querying arXiv");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        let feed = parser::parse(bytes.as_ref())
            .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))?;

        let papers = feed
            .entries
            .iter()
            .take(query.max_results)
            .map(Self::parse_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchResponse::new(papers, self.name(), &query.query))
    }
}
