use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pongstats::shot::{NewShot, ShotRepository};
use pongstats::{AppError, InMemoryStore, ShotModel};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Shot store that forwards to an in-memory store until told to fail
pub struct FlakyShotStore {
    inner: Arc<InMemoryStore>,
    failing: AtomicBool,
}

impl FlakyShotStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ShotRepository for FlakyShotStore {
    async fn insert_shot(&self, shot: &NewShot) -> Result<ShotModel, AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("store unavailable".to_string()));
        }
        self.inner.insert_shot(shot).await
    }

    async fn list_shots(&self) -> Result<Vec<ShotModel>, AppError> {
        self.inner.list_shots().await
    }

    async fn list_shots_for_player(&self, player_id: &str) -> Result<Vec<ShotModel>, AppError> {
        self.inner.list_shots_for_player(player_id).await
    }

    async fn list_shots_for_game(&self, game_id: &str) -> Result<Vec<ShotModel>, AppError> {
        self.inner.list_shots_for_game(game_id).await
    }
}
