//! HTTP server exposing the notebook API.
//!
//! | Method | Path          | Handler                 |
//! |--------|---------------|-------------------------|
//! | POST   | `/ask`        | note analysis           |
//! | POST   | `/ask_paper`  | keyword + arXiv search  |
//! | POST   | `/save_all`   | overwrite saved state   |
//! | GET    | `/api/load`   | read saved state        |
//! | GET    | `/health`     | liveness                |
//!
//! Cross-origin requests are accepted from anywhere; bind to a local or
//! trusted interface only.

mod handlers;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::llm::TextGenerator;
use crate::services::{AdviceGenerator, PaperSearcher};
use crate::sources::Source;
use crate::store::DocumentStore;

/// Process-wide state shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub advisor: AdviceGenerator,
    pub searcher: PaperSearcher,
}

impl AppState {
    /// Wire the services to the given providers
    pub fn new(
        config: &Config,
        generator: Arc<dyn TextGenerator>,
        source: Arc<dyn Source>,
    ) -> Self {
        Self {
            store: Arc::new(DocumentStore::new(&config.storage.data_file)),
            advisor: AdviceGenerator::new(
                Arc::clone(&generator),
                &config.llm.response_language,
            ),
            searcher: PaperSearcher::new(generator, source, config.arxiv.max_results),
        }
    }
}

/// Build the router for `state`
pub fn router(state: AppState) -> axum::Router {
    handlers::router(state)
}

/// Serve until Ctrl-C (or SIGTERM on unix)
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}
