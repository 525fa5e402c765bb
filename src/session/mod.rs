// Public API - what other modules can use
pub use handlers::{get_session, log_shot, reload_session, select_player};
pub use state::{GameSession, SessionSnapshot};
pub use tracker::{GameTracker, NewGamePrompt, TrackerError};

// Internal modules
mod handlers;
pub mod state;
pub mod tracker;
