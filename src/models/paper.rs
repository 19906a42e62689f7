//! Paper models: the full entry returned by a source and the trimmed record
//! handed back to the notebook frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for [`PaperRecord::published`]
pub const PUBLISHED_DATE_FORMAT: &str = "%Y-%m-%d";

/// A research paper as parsed from a source response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Source-specific identifier (arXiv ID for arXiv)
    pub paper_id: String,

    /// Paper title
    pub title: String,

    /// Abstract text
    pub r#abstract: String,

    /// Publication timestamp
    pub published: Option<DateTime<Utc>>,

    /// Direct PDF URL
    pub pdf_url: Option<String>,

    /// Paper page URL
    pub url: String,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(paper_id: String, title: String, url: String) -> Self {
        Self {
            paper_id,
            title,
            r#abstract: String::new(),
            published: None,
            pdf_url: None,
            url,
        }
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(
        paper_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            paper: Paper::new(paper_id.into(), title.into(), url.into()),
        }
    }

    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = abstract_text.into();
        self
    }

    pub fn published(mut self, published: DateTime<Utc>) -> Self {
        self.paper.published = Some(published);
        self
    }

    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.paper.pdf_url = Some(url.into());
        self
    }

    pub fn build(self) -> Paper {
        self.paper
    }
}

/// Normalized search result returned by `/ask_paper`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,

    /// PDF link
    pub url: String,

    pub r#abstract: String,

    /// Publication date as `YYYY-MM-DD`
    pub published: String,
}

impl From<&Paper> for PaperRecord {
    fn from(paper: &Paper) -> Self {
        Self {
            title: paper.title.clone(),
            url: paper.pdf_url.clone().unwrap_or_else(|| paper.url.clone()),
            r#abstract: paper.r#abstract.clone(),
            published: paper
                .published
                .map(|d| d.format(PUBLISHED_DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new("2301.12345", "Test Paper", "https://arxiv.org/abs/2301.12345")
            .abstract_text("This is a test abstract.")
            .pdf_url("https://arxiv.org/pdf/2301.12345")
            .build();

        assert_eq!(paper.paper_id, "2301.12345");
        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.pdf_url.as_deref(), Some("https://arxiv.org/pdf/2301.12345"));
        assert!(paper.published.is_none());
    }

    #[test]
    fn test_record_drops_time_of_day() {
        let published = Utc.with_ymd_and_hms(2023, 1, 15, 23, 59, 58).unwrap();
        let paper = PaperBuilder::new("1", "Catalysis", "https://arxiv.org/abs/1")
            .abstract_text("abs")
            .pdf_url("https://arxiv.org/pdf/1")
            .published(published)
            .build();

        let record = PaperRecord::from(&paper);
        assert_eq!(record.title, "Catalysis");
        assert_eq!(record.url, "https://arxiv.org/pdf/1");
        assert_eq!(record.r#abstract, "abs");
        assert_eq!(record.published, "2023-01-15");
    }

    #[test]
    fn test_record_serializes_abstract_field() {
        let record = PaperRecord {
            title: "t".to_string(),
            url: "u".to_string(),
            r#abstract: "a".to_string(),
            published: "2020-02-02".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abstract"], "a");
        assert_eq!(json["published"], "2020-02-02");
    }
}
