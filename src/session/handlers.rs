use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::state::SessionSnapshot;
use crate::shared::{AppError, AppJson, AppState};
use crate::shot::{ShotDraft, ShotModel};

#[derive(Debug, Deserialize)]
pub struct SelectPlayerRequest {
    pub player_id: String,
}

/// A logged shot and the session it landed in
#[derive(Debug, Serialize, Deserialize)]
pub struct LogShotResponse {
    pub shot: ShotModel,
    pub session: SessionSnapshot,
}

/// GET /session
#[instrument(name = "get_session", skip(state))]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let tracker = state.tracker.lock().await;
    Json(tracker.session().snapshot())
}

/// POST /session/reload
///
/// Discards local state, including unconfirmed shots, and reloads the
/// active game from the store.
#[instrument(name = "reload_session", skip(state))]
pub async fn reload_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.rehydrate().await?;
    Ok(Json(tracker.session().snapshot()))
}

/// POST /session/selected-player
#[instrument(name = "select_player", skip(state))]
pub async fn select_player(
    State(state): State<AppState>,
    AppJson(request): AppJson<SelectPlayerRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.select_player(&request.player_id)?;
    Ok(Json(tracker.session().snapshot()))
}

/// POST /session/shots
#[instrument(name = "log_shot", skip(state))]
pub async fn log_shot(
    State(state): State<AppState>,
    AppJson(draft): AppJson<ShotDraft>,
) -> Result<Json<LogShotResponse>, AppError> {
    let mut tracker = state.tracker.lock().await;
    let shot = tracker.log_shot(draft).await?;

    info!(
        shot_id = %shot.id,
        unconfirmed = tracker.session().unconfirmed_shot_ids().len(),
        "Shot accepted"
    );

    Ok(Json(LogShotResponse {
        shot,
        session: tracker.session().snapshot(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameSetup;
    use crate::shared::test_utils::in_memory_state;
    use crate::shot::ShotRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn router(state: AppState) -> Router {
        Router::new()
            .route("/session", get(get_session))
            .route("/session/reload", post(reload_session))
            .route("/session/selected-player", post(select_player))
            .route("/session/shots", post(log_shot))
            .with_state(state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_log_shot_without_game_is_conflict() {
        let (state, _store) = in_memory_state();

        let response = router(state)
            .oneshot(post_json(
                "/session/shots",
                serde_json::json!({"type": "throw", "made": true, "cup": 3}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_select_and_log_shot() {
        let (state, store) = in_memory_state();
        state
            .tracker
            .lock()
            .await
            .start_game(&GameSetup::new("friday", &["alice"], &["bob"]), false)
            .await
            .unwrap();
        let bob_id = state.tracker.lock().await.session().teams()[1][0].id.clone();
        let app = router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/session/selected-player",
                serde_json::json!({ "player_id": bob_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["selected_player"]["name"], "bob");

        let response = app
            .clone()
            .oneshot(post_json(
                "/session/shots",
                serde_json::json!({"type": "bounce", "made": true, "cup": 9}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["shot"]["cup_hit"], 9);
        assert_eq!(body["shot"]["type"], "bounce");
        assert_eq!(body["session"]["unconfirmed_shot_ids"], serde_json::json!([]));
        let stored = store.list_shots().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(body["shot"]["id"], stored[0].id.as_str());

        let response = app
            .oneshot(post_json(
                "/session/shots",
                serde_json::json!({"type": "throw", "made": true}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reload_with_empty_store() {
        let (state, _store) = in_memory_state();

        let response = router(state)
            .oneshot(post_json("/session/reload", serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["current_game_id"].is_null());
        assert_eq!(body["shots"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_malformed_shot_is_json_error() {
        let (state, _store) = in_memory_state();

        let response = router(state)
            .oneshot(post_json(
                "/session/shots",
                serde_json::json!({"type": "dunk", "made": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }
}
