//! Core data models for papers, searches and the notebook document.

mod notes;
mod paper;
mod search;

pub use notes::{
    AnalysisResponse, BookmarkedPaper, NoteAnalysisRequest, PaperSearchRequest,
    PaperSearchResponse, PersistedDocument, SaveResponse, SaveStatus,
};
pub use paper::{Paper, PaperBuilder, PaperRecord, PUBLISHED_DATE_FORMAT};
pub use search::{SearchQuery, SearchResponse};
