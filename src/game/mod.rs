// Public API - what other modules can use
pub use handlers::{end_game, new_game_prompt, start_game};
pub use models::{GameModel, GameSetup, GameSummary, Teams};
pub use repository::GameRepository;
pub use service::{ActiveGame, GameService, StartedGame};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
