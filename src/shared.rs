use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::game::{GameRepository, GameService};
use crate::player::repository::PlayerRepository;
use crate::session::GameTracker;
use crate::shot::ShotRepository;
use crate::stats::StatsService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository>,
    pub stats_service: Arc<StatsService>,
    /// One tracker per process; requests that touch the session are serialized here
    pub tracker: Arc<Mutex<GameTracker>>,
}

impl AppState {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository>,
        stats_service: Arc<StatsService>,
        tracker: GameTracker,
    ) -> Self {
        Self {
            player_repository,
            stats_service,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Wires every service to one store that backs all three repositories
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: PlayerRepository + GameRepository + ShotRepository + 'static,
    {
        let game_service = Arc::new(GameService::new(store.clone(), store.clone(), store.clone()));
        let stats_service = Arc::new(StatsService::new(store.clone(), store.clone(), store.clone()));
        let tracker = GameTracker::new(game_service, store.clone());
        Self::new(store, stats_service, tracker)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// Extractors that reject with the same JSON error body as every handler

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Parses a comma separated id list from a query string, dropping blanks
pub fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::db::InMemoryStore;

    /// Builds an AppState backed by a single in-memory store
    pub fn in_memory_state() -> (AppState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (AppState::from_store(store.clone()), store)
    }

    #[test]
    fn split_ids_drops_blank_entries() {
        assert_eq!(
            split_ids(Some("a, b,,c ")),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_ids(Some("")).is_empty());
        assert!(split_ids(None).is_empty());
    }
}
