use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::models::PlayerModel;
use crate::game::models::GameSummary;
use crate::shared::{AppError, AppPath, AppState};

/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<PlayerModel>>, AppError> {
    let players = state.player_repository.list_players().await?;
    info!(player_count = players.len(), "Players listed");
    Ok(Json(players))
}

/// GET /players/:id/games
///
/// Games in which the player has at least one logged shot, used to build the
/// game filter on the stats view.
#[instrument(name = "list_games_for_player", skip(state))]
pub async fn list_games_for_player(
    State(state): State<AppState>,
    AppPath(player_id): AppPath<String>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    let games = state.stats_service.games_for_player(&player_id).await?;
    Ok(Json(games))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::repository::PlayerRepository;
    use crate::shared::test_utils::in_memory_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_list_players_handler() {
        let (app_state, store) = in_memory_state();
        store.create_player("alice").await.unwrap();
        store.create_player("bob").await.unwrap();

        let app = Router::new()
            .route("/players", get(list_players))
            .with_state(app_state);

        let request = Request::builder()
            .method("GET")
            .uri("/players")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let players: Vec<PlayerModel> = serde_json::from_slice(&body).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "alice");
    }
}
