use std::sync::{Mutex, MutexGuard};

use crate::game::models::GameModel;
use crate::player::models::PlayerModel;
use crate::shared::AppError;
use crate::shot::models::ShotModel;

/// Rows held by the in-memory store, one vector per table
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub players: Vec<PlayerModel>,
    pub games: Vec<GameModel>,
    /// (game_id, player_id) pairs in insertion order
    pub game_players: Vec<(String, String)>,
    pub shots: Vec<ShotModel>,
}

/// In-memory implementation of every repository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
/// Ids are generated as UUID v4 strings, matching what the database assigns.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn tables(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables.lock().map_err(|_| AppError::Internal)
    }

    /// Returns the current number of player rows
    pub fn player_count(&self) -> usize {
        self.tables().map(|t| t.players.len()).unwrap_or_default()
    }

    /// Returns the current number of shot rows
    pub fn shot_count(&self) -> usize {
        self.tables().map(|t| t.shots.len()).unwrap_or_default()
    }

    /// Looks up a game row by id (useful for assertions)
    pub fn game(&self, game_id: &str) -> Option<GameModel> {
        self.tables()
            .ok()?
            .games
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
    }
}
