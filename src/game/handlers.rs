use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::models::GameSetup;
use crate::session::{NewGamePrompt, SessionSnapshot};
use crate::shared::{AppError, AppJson, AppState};

/// Body of POST /games
#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    #[serde(flatten)]
    pub setup: GameSetup,
    /// Set once the user has agreed to abandon a game with shots
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewGamePromptResponse {
    pub prompt: NewGamePrompt,
    pub current_game_id: Option<String>,
    pub shot_count: usize,
}

/// GET /games/new/prompt
#[instrument(name = "new_game_prompt", skip(state))]
pub async fn new_game_prompt(State(state): State<AppState>) -> Json<NewGamePromptResponse> {
    let tracker = state.tracker.lock().await;
    let session = tracker.session();

    Json(NewGamePromptResponse {
        prompt: tracker.new_game_prompt(),
        current_game_id: session.current_game_id().map(str::to_string),
        shot_count: session.shots().len(),
    })
}

/// POST /games
///
/// Starts a game from a name and two teams of player names. Answers 409
/// when the current game has shots and `confirmed` is not set.
#[instrument(name = "start_game", skip(state))]
pub async fn start_game(
    State(state): State<AppState>,
    AppJson(request): AppJson<StartGameRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.start_game(&request.setup, request.confirmed).await?;

    let snapshot = tracker.session().snapshot();
    info!(game_id = ?snapshot.current_game_id, "New game in session");
    Ok(Json(snapshot))
}

/// POST /games/end
#[instrument(name = "end_game", skip(state))]
pub async fn end_game(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    let mut tracker = state.tracker.lock().await;
    tracker.end_game().await?;
    Ok(Json(tracker.session().snapshot()))
}
