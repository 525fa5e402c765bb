// Library crate for the beer pong stats tracker
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod db;
pub mod game;
pub mod player;
pub mod session;
pub mod shared;
pub mod shot;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types for easier access in tests
pub use config::Config;
pub use db::{InMemoryStore, PostgresStore};
pub use game::{GameModel, GameSetup};
pub use player::PlayerModel;
pub use session::{GameSession, GameTracker, NewGamePrompt, SessionSnapshot, TrackerError};
pub use shared::{AppError, AppState};
pub use shot::{ShotDraft, ShotModel, ShotType};
pub use stats::{PlayerReport, StatsService};

/// Every HTTP route of the app
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/players", get(player::list_players))
        .route("/players/:id/games", get(player::list_games_for_player))
        .route("/session", get(session::get_session))
        .route("/session/reload", post(session::reload_session))
        .route("/session/selected-player", post(session::select_player))
        .route("/session/shots", post(session::log_shot))
        .route("/games", post(game::start_game))
        .route("/games/new/prompt", get(game::new_game_prompt))
        .route("/games/end", post(game::end_game))
        .route("/stats", get(stats::all_player_stats))
        .route("/stats/players/:id", get(stats::player_stats))
        .route("/stats/compare", get(stats::compare_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
