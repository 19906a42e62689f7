//! Utility modules shared by the provider clients.
//!
//! - [`HttpClient`]: reqwest client with a user agent and timeouts

mod http;

pub use http::HttpClient;
