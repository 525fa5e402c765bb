use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::models::{GameModel, GameSummary};
use crate::db::postgres::{parse_id, store_error};
use crate::db::{first_related, InMemoryStore, PostgresStore, Related};
use crate::player::models::PlayerModel;
use crate::shared::AppError;

/// Trait for game repository operations
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Creates an active game named `name` starting now
    async fn create_game(&self, name: &str) -> Result<GameModel, AppError>;

    /// Associates the roster with a game. Either every player is added or none is.
    async fn add_players_to_game(&self, game_id: &str, player_ids: &[String]) -> Result<(), AppError>;

    /// Roster of a game in the order it was added
    async fn get_players_for_game(&self, game_id: &str) -> Result<Vec<PlayerModel>, AppError>;

    /// Most recently started active game, if any
    async fn get_active_game(&self) -> Result<Option<GameModel>, AppError>;

    /// Marks one game inactive
    async fn end_game(&self, game_id: &str) -> Result<(), AppError>;

    /// Marks every active game inactive, returning how many were ended
    async fn set_all_games_inactive(&self) -> Result<u64, AppError>;

    /// Games in which the player has logged shots, deduplicated, in the order
    /// their first shot was found
    async fn get_games_for_player(&self, player_id: &str) -> Result<Vec<GameSummary>, AppError>;
}

/// Collapses shot-to-game join rows into one summary per game
fn unique_games(rows: Vec<Related<GameSummary>>) -> Vec<GameSummary> {
    let mut seen = HashSet::new();
    let rows = rows
        .into_iter()
        .filter(|row| seen.insert(row.key.clone()))
        .collect();
    first_related(rows)
}

#[async_trait]
impl GameRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn create_game(&self, name: &str) -> Result<GameModel, AppError> {
        let game = GameModel {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            started_at: Utc::now(),
            active: true,
        };

        self.tables()?.games.push(game.clone());

        debug!(game_id = %game.id, name = %name, "Game created in memory");
        Ok(game)
    }

    #[instrument(skip(self, player_ids))]
    async fn add_players_to_game(&self, game_id: &str, player_ids: &[String]) -> Result<(), AppError> {
        let mut tables = self.tables()?;

        if !tables.games.iter().any(|g| g.id == game_id) {
            warn!(game_id = %game_id, "Roster references unknown game");
            return Err(AppError::DatabaseError(format!("Unknown game {}", game_id)));
        }

        let mut pending = HashSet::new();
        for player_id in player_ids {
            if !tables.players.iter().any(|p| &p.id == player_id) {
                warn!(player_id = %player_id, "Roster references unknown player");
                return Err(AppError::DatabaseError(format!("Unknown player {}", player_id)));
            }
            let duplicate = tables
                .game_players
                .iter()
                .any(|(g, p)| g == game_id && p == player_id);
            if duplicate || !pending.insert(player_id.as_str()) {
                warn!(game_id = %game_id, player_id = %player_id, "Player already on roster");
                return Err(AppError::DatabaseError(format!(
                    "Player {} already in game {}",
                    player_id, game_id
                )));
            }
        }

        tables.game_players.extend(
            player_ids
                .iter()
                .map(|player_id| (game_id.to_string(), player_id.clone())),
        );

        debug!(game_id = %game_id, roster_size = player_ids.len(), "Roster stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_players_for_game(&self, game_id: &str) -> Result<Vec<PlayerModel>, AppError> {
        let tables = self.tables()?;
        let rows = tables
            .game_players
            .iter()
            .filter(|(g, _)| g == game_id)
            .map(|(_, player_id)| {
                let player = tables.players.iter().find(|p| &p.id == player_id).cloned();
                Related::from_optional(player_id.clone(), player)
            })
            .collect();
        Ok(first_related(rows))
    }

    #[instrument(skip(self))]
    async fn get_active_game(&self) -> Result<Option<GameModel>, AppError> {
        let tables = self.tables()?;
        // Later insertion wins a started_at tie
        let active = tables
            .games
            .iter()
            .enumerate()
            .filter(|(_, g)| g.active)
            .max_by_key(|(index, g)| (g.started_at, *index))
            .map(|(_, g)| g.clone());

        match &active {
            Some(game) => debug!(game_id = %game.id, "Active game found in memory"),
            None => debug!("No active game in memory"),
        }
        Ok(active)
    }

    #[instrument(skip(self))]
    async fn end_game(&self, game_id: &str) -> Result<(), AppError> {
        let mut tables = self.tables()?;
        let game = tables
            .games
            .iter_mut()
            .find(|g| g.id == game_id)
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;
        game.active = false;

        info!(game_id = %game_id, "Game ended in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_all_games_inactive(&self) -> Result<u64, AppError> {
        let mut tables = self.tables()?;
        let mut ended = 0;
        for game in tables.games.iter_mut().filter(|g| g.active) {
            game.active = false;
            ended += 1;
        }

        debug!(ended, "All games marked inactive in memory");
        Ok(ended)
    }

    #[instrument(skip(self))]
    async fn get_games_for_player(&self, player_id: &str) -> Result<Vec<GameSummary>, AppError> {
        let tables = self.tables()?;
        let rows = tables
            .shots
            .iter()
            .filter(|s| s.player_id == player_id)
            .map(|shot| {
                let game = tables
                    .games
                    .iter()
                    .find(|g| g.id == shot.game_id)
                    .map(GameModel::summary);
                Related::from_optional(shot.game_id.clone(), game)
            })
            .collect();
        Ok(unique_games(rows))
    }
}

#[async_trait]
impl GameRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn create_game(&self, name: &str) -> Result<GameModel, AppError> {
        let game = sqlx::query_as::<_, GameModel>(
            "INSERT INTO games (name, started_at, active) VALUES ($1, $2, TRUE) \
             RETURNING id::text AS id, name, started_at, active",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await
        .map_err(store_error("Failed to create game"))?;

        debug!(game_id = %game.id, name = %name, "Game created in database");
        Ok(game)
    }

    #[instrument(skip(self, player_ids))]
    async fn add_players_to_game(&self, game_id: &str, player_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(store_error("Failed to open roster transaction"))?;

        for (seat, player_id) in player_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO game_players (game_id, player_id, seat) VALUES ($1::uuid, $2::uuid, $3)",
            )
            .bind(game_id)
            .bind(player_id)
            .bind(seat as i32)
            .execute(&mut *tx)
            .await
            .map_err(store_error("Failed to add player to game"))?;
        }

        tx.commit()
            .await
            .map_err(store_error("Failed to commit roster"))?;

        debug!(game_id = %game_id, roster_size = player_ids.len(), "Roster stored in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_players_for_game(&self, game_id: &str) -> Result<Vec<PlayerModel>, AppError> {
        let Some(game_uuid) = parse_id(game_id) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            "SELECT gp.player_id::text AS player_key, p.id::text AS id, p.name AS name \
             FROM game_players gp LEFT JOIN players p ON p.id = gp.player_id \
             WHERE gp.game_id = $1 ORDER BY gp.seat",
        )
        .bind(game_uuid)
        .fetch_all(self.pool())
        .await
        .map_err(store_error("Failed to fetch roster"))?;

        let related = rows
            .iter()
            .map(|row| {
                let key: String = row.try_get("player_key")?;
                let id: Option<String> = row.try_get("id")?;
                let name: Option<String> = row.try_get("name")?;
                let player = id.zip(name).map(|(id, name)| PlayerModel { id, name });
                Ok::<_, sqlx::Error>(Related::from_optional(key, player))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(store_error("Failed to decode roster row"))?;

        Ok(first_related(related))
    }

    #[instrument(skip(self))]
    async fn get_active_game(&self) -> Result<Option<GameModel>, AppError> {
        sqlx::query_as::<_, GameModel>(
            "SELECT id::text AS id, name, started_at, active FROM games \
             WHERE active = TRUE ORDER BY started_at DESC LIMIT 1",
        )
        .fetch_optional(self.pool())
        .await
        .map_err(store_error("Failed to fetch active game"))
    }

    #[instrument(skip(self))]
    async fn end_game(&self, game_id: &str) -> Result<(), AppError> {
        let not_found = || {
            warn!(game_id = %game_id, "Game not found to end");
            AppError::NotFound(format!("Game {} not found", game_id))
        };
        let game_uuid = parse_id(game_id).ok_or_else(not_found)?;

        let result = sqlx::query("UPDATE games SET active = FALSE WHERE id = $1")
            .bind(game_uuid)
            .execute(self.pool())
            .await
            .map_err(store_error("Failed to end game"))?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        info!(game_id = %game_id, "Game ended in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_all_games_inactive(&self) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE games SET active = FALSE WHERE active = TRUE")
            .execute(self.pool())
            .await
            .map_err(store_error("Failed to mark games inactive"))?;

        debug!(ended = result.rows_affected(), "All games marked inactive in database");
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn get_games_for_player(&self, player_id: &str) -> Result<Vec<GameSummary>, AppError> {
        let Some(player_uuid) = parse_id(player_id) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            "SELECT s.game_id::text AS game_key, g.id::text AS id, g.name AS name, g.started_at AS started_at \
             FROM shots s LEFT JOIN games g ON g.id = s.game_id \
             WHERE s.player_id = $1 ORDER BY s.timestamp",
        )
        .bind(player_uuid)
        .fetch_all(self.pool())
        .await
        .map_err(store_error("Failed to fetch games for player"))?;

        let related = rows
            .iter()
            .map(|row| {
                let key: String = row.try_get("game_key")?;
                let id: Option<String> = row.try_get("id")?;
                let name: Option<String> = row.try_get("name")?;
                let started_at: Option<DateTime<Utc>> = row.try_get("started_at")?;
                let game = match (id, name, started_at) {
                    (Some(id), Some(name), Some(started_at)) => Some(GameSummary {
                        id,
                        name,
                        started_at,
                    }),
                    _ => None,
                };
                Ok::<_, sqlx::Error>(Related::from_optional(key, game))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(store_error("Failed to decode game row"))?;

        Ok(unique_games(related))
    }
}
