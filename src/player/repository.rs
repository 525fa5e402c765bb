use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::PlayerModel;
use crate::db::postgres::{parse_id, store_error};
use crate::db::{InMemoryStore, PostgresStore};
use crate::shared::AppError;

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Exact-match lookup; `Ok(None)` when no player has this name
    async fn find_player_by_name(&self, name: &str) -> Result<Option<PlayerModel>, AppError>;
    async fn create_player(&self, name: &str) -> Result<PlayerModel, AppError>;
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError>;
    async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError>;
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn find_player_by_name(&self, name: &str) -> Result<Option<PlayerModel>, AppError> {
        debug!(name = %name, "Looking up player by name in memory");

        let tables = self.tables()?;
        Ok(tables.players.iter().find(|p| p.name == name).cloned())
    }

    #[instrument(skip(self))]
    async fn create_player(&self, name: &str) -> Result<PlayerModel, AppError> {
        let mut tables = self.tables()?;
        if tables.players.iter().any(|p| p.name == name) {
            warn!(name = %name, "Player name already exists in memory");
            return Err(AppError::Conflict(format!("Player '{}' already exists", name)));
        }

        let player = PlayerModel::new(Uuid::new_v4().to_string(), name);
        tables.players.push(player.clone());

        debug!(player_id = %player.id, name = %name, "Player created in memory");
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let tables = self.tables()?;
        Ok(tables.players.iter().find(|p| p.id == player_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError> {
        let tables = self.tables()?;
        let mut players = tables.players.clone();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }
}

#[async_trait]
impl PlayerRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn find_player_by_name(&self, name: &str) -> Result<Option<PlayerModel>, AppError> {
        debug!(name = %name, "Looking up player by name in database");

        sqlx::query_as::<_, PlayerModel>("SELECT id::text AS id, name FROM players WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(store_error("Failed to look up player by name"))
    }

    #[instrument(skip(self))]
    async fn create_player(&self, name: &str) -> Result<PlayerModel, AppError> {
        let player = sqlx::query_as::<_, PlayerModel>(
            "INSERT INTO players (name) VALUES ($1) RETURNING id::text AS id, name",
        )
        .bind(name)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            // Another client created the same name first
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                warn!(name = %name, "Player name already taken");
                return AppError::Conflict(format!("Player '{}' already exists", name));
            }
            store_error("Failed to create player")(e)
        })?;

        debug!(player_id = %player.id, name = %name, "Player created in database");
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &str) -> Result<Option<PlayerModel>, AppError> {
        let Some(id) = parse_id(player_id) else {
            return Ok(None);
        };

        sqlx::query_as::<_, PlayerModel>("SELECT id::text AS id, name FROM players WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(store_error("Failed to fetch player"))
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<PlayerModel>, AppError> {
        sqlx::query_as::<_, PlayerModel>("SELECT id::text AS id, name FROM players ORDER BY name")
            .fetch_all(self.pool())
            .await
            .map_err(store_error("Failed to list players"))
    }
}
