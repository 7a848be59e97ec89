//! HTTP routes.
//!
//! Read-only projections of registry state for lobby browsers and
//! monitoring; every mutation goes through the WebSocket router.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use quizcast_domain::QuizId;
use quizcast_protocol::GameSummary;

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/games", get(list_games))
        .route("/api/games/{id}", get(get_game))
}

async fn health() -> &'static str {
    "OK"
}

/// List every registered game with its roster.
async fn list_games(State(app): State<Arc<App>>) -> Json<Vec<GameSummary>> {
    Json(app.registry.list_games().await)
}

/// A single game's roster by id.
async fn get_game(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<GameSummary>, ApiError> {
    let quiz_id: QuizId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid game id: {id}")))?;
    let summary = app
        .registry
        .find_summary(quiz_id)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(Json(summary))
}

/// API error types.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}
