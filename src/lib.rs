//! # Research Notebook
//!
//! Backend for a research notebook frontend: note analysis through a
//! generative model, arXiv paper search, and a single JSON file holding the
//! user's notes and bookmarks.
//!
//! ## Architecture
//!
//! - [`config`]: Layered configuration (defaults, TOML file, environment)
//! - [`models`]: Request/response types and the persisted document
//! - [`store`]: Flat-file persistence of the notebook document
//! - [`llm`]: Text generator trait and the Gemini client
//! - [`sources`]: Paper source trait and the arXiv client
//! - [`services`]: Advice and paper-search services built on the providers
//! - [`server`]: axum router and HTTP handlers
//! - [`utils`]: Shared HTTP client

pub mod config;
pub mod llm;
pub mod models;
pub mod server;
pub mod services;
pub mod sources;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use models::{PaperRecord, PersistedDocument};
pub use server::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
