// Public API - what other modules can use
pub use handlers::{list_games_for_player, list_players};
pub use models::PlayerModel;
pub use repository::PlayerRepository;
pub use service::PlayerService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
