//! Notebook request, response and persisted-document models.
//!
//! Files and bookmarks are owned by the frontend; the service only looks at
//! bookmark titles, so everything else is kept as opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::PaperRecord;

/// Body of `POST /ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteAnalysisRequest {
    /// Note text to analyse
    pub text: String,

    /// Papers the user bookmarked, used as reading context
    #[serde(default)]
    pub bookmarked_papers: Vec<BookmarkedPaper>,
}

/// A bookmarked paper as stored by the frontend. Only the title is read;
/// the value is otherwise passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkedPaper(Value);

impl BookmarkedPaper {
    pub fn titled(title: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("title".to_string(), Value::String(title.into()));
        Self(Value::Object(map))
    }

    /// The `title` field, if present and a string
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}

/// Body of `POST /ask_paper`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperSearchRequest {
    pub text: String,
}

/// Result of `POST /ask`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Analysis { analysis: String },
    Error { error: String },
}

/// Result of `POST /ask_paper`; `papers` is present on both branches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub papers: Vec<PaperRecord>,
}

impl PaperSearchResponse {
    pub fn found(papers: Vec<PaperRecord>) -> Self {
        Self {
            error: None,
            papers,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            papers: Vec::new(),
        }
    }
}

/// Outcome of a save call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// The document was written
    Success,
    /// An empty `files` payload was refused because saved state already exists
    Ignored,
}

/// Result of `POST /save_all`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: SaveStatus,
}

/// The whole notebook state written to disk.
///
/// Kept as the JSON object the frontend sent so that it is stored verbatim;
/// only `files` is inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedDocument(Map<String, Value>);

impl PersistedDocument {
    /// Document returned when nothing has been saved yet
    pub fn empty() -> Self {
        let mut map = Map::new();
        map.insert("files".to_string(), Value::Array(Vec::new()));
        map.insert("bookmarks".to_string(), Value::Array(Vec::new()));
        Self(map)
    }

    /// Number of entries in `files`; zero when the key is missing or null.
    pub fn file_count(&self) -> usize {
        match self.0.get("files") {
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(items)) => items.len(),
            Some(Value::String(text)) => text.chars().count(),
            _ => 0,
        }
    }

    /// Number of entries in `bookmarks`, for logging
    pub fn bookmark_count(&self) -> usize {
        self.0
            .get("bookmarks")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl Default for PersistedDocument {
    fn default() -> Self {
        Self::empty()
    }
}
