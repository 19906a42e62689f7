//! HTTP request handlers for the notebook API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::AppState;
use crate::models::{
    AnalysisResponse, NoteAnalysisRequest, PaperSearchRequest, PaperSearchResponse,
    PersistedDocument, SaveResponse,
};
use crate::store::StoreError;

/// Build the axum router with all routes
pub(super) fn router(state: AppState) -> axum::Router {
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    axum::Router::new()
        .route("/ask", post(ask))
        .route("/ask_paper", post(ask_paper))
        .route("/save_all", post(save_all))
        .route("/api/load", get(load))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Storage failures are the only errors surfaced as a non-200 status.
struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Storage error: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// -- /ask --

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<NoteAnalysisRequest>,
) -> Json<AnalysisResponse> {
    Json(state.advisor.respond(&request).await)
}

// -- /ask_paper --

async fn ask_paper(
    State(state): State<AppState>,
    Json(request): Json<PaperSearchRequest>,
) -> Json<PaperSearchResponse> {
    Json(state.searcher.respond(&request.text).await)
}

// -- /save_all --

async fn save_all(
    State(state): State<AppState>,
    Json(document): Json<PersistedDocument>,
) -> Result<Json<SaveResponse>, ApiError> {
    let status = state.store.save(&document).await?;
    Ok(Json(SaveResponse { status }))
}

// -- /api/load --

async fn load(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.store.load().await?))
}

// -- /health --

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}
