use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{models::PlayerModel, repository::PlayerRepository};
use crate::shared::AppError;

/// Service for resolving player names to stored players
#[derive(Clone)]
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self { repository }
    }

    /// Returns the player with this name, creating it on first reference.
    ///
    /// The name is trimmed before lookup. Repeated calls with the same name
    /// return the same player id.
    #[instrument(skip(self))]
    pub async fn get_or_create_player_by_name(&self, name: &str) -> Result<PlayerModel, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Player name cannot be empty".to_string()));
        }

        if let Some(existing) = self.repository.find_player_by_name(name).await? {
            debug!(player_id = %existing.id, name = %name, "Found existing player");
            return Ok(existing);
        }

        match self.repository.create_player(name).await {
            Ok(player) => {
                info!(player_id = %player.id, name = %name, "Created new player");
                Ok(player)
            }
            // Lost a race with another client creating the same name
            Err(AppError::Conflict(_)) => {
                debug!(name = %name, "Player created concurrently, looking up again");
                self.repository
                    .find_player_by_name(name)
                    .await?
                    .ok_or_else(|| AppError::Conflict(format!("Player '{}' already exists", name)))
            }
            Err(e) => Err(e),
        }
    }
}
