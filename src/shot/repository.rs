use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{NewShot, ShotModel, ShotType};
use crate::db::postgres::{parse_id, store_error};
use crate::db::{InMemoryStore, PostgresStore};
use crate::shared::AppError;

/// Trait for shot repository operations. Shots are append-only.
#[async_trait]
pub trait ShotRepository: Send + Sync {
    /// Inserts a shot and returns it with the store-assigned id
    async fn insert_shot(&self, shot: &NewShot) -> Result<ShotModel, AppError>;
    async fn list_shots(&self) -> Result<Vec<ShotModel>, AppError>;
    async fn list_shots_for_player(&self, player_id: &str) -> Result<Vec<ShotModel>, AppError>;
    async fn list_shots_for_game(&self, game_id: &str) -> Result<Vec<ShotModel>, AppError>;
}

#[async_trait]
impl ShotRepository for InMemoryStore {
    #[instrument(skip(self, shot))]
    async fn insert_shot(&self, shot: &NewShot) -> Result<ShotModel, AppError> {
        let mut tables = self.tables()?;

        // Same foreign keys the database enforces
        if !tables.players.iter().any(|p| p.id == shot.player_id) {
            warn!(player_id = %shot.player_id, "Shot references unknown player");
            return Err(AppError::DatabaseError(format!(
                "Unknown player {}",
                shot.player_id
            )));
        }
        if !tables.games.iter().any(|g| g.id == shot.game_id) {
            warn!(game_id = %shot.game_id, "Shot references unknown game");
            return Err(AppError::DatabaseError(format!(
                "Unknown game {}",
                shot.game_id
            )));
        }

        let stored = shot.clone().into_model(Uuid::new_v4().to_string());
        tables.shots.push(stored.clone());

        debug!(shot_id = %stored.id, game_id = %stored.game_id, "Shot stored in memory");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn list_shots(&self) -> Result<Vec<ShotModel>, AppError> {
        Ok(self.tables()?.shots.clone())
    }

    #[instrument(skip(self))]
    async fn list_shots_for_player(&self, player_id: &str) -> Result<Vec<ShotModel>, AppError> {
        let tables = self.tables()?;
        Ok(tables
            .shots
            .iter()
            .filter(|s| s.player_id == player_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_shots_for_game(&self, game_id: &str) -> Result<Vec<ShotModel>, AppError> {
        let tables = self.tables()?;
        Ok(tables
            .shots
            .iter()
            .filter(|s| s.game_id == game_id)
            .cloned()
            .collect())
    }
}

const SHOT_COLUMNS: &str = "id::text AS id, player_id::text AS player_id, game_id::text AS game_id, \
     made, cup_hit, type, timestamp";

fn shot_from_row(row: &PgRow) -> Result<ShotModel, sqlx::Error> {
    let shot_type: String = row.try_get("type")?;
    let shot_type = ShotType::from_str(&shot_type).map_err(|e| sqlx::Error::ColumnDecode {
        index: "type".to_string(),
        source: Box::new(e),
    })?;

    Ok(ShotModel {
        id: row.try_get("id")?,
        player_id: row.try_get("player_id")?,
        game_id: row.try_get("game_id")?,
        made: row.try_get("made")?,
        cup_hit: row.try_get("cup_hit")?,
        shot_type,
        timestamp: row.try_get("timestamp")?,
    })
}

impl PostgresStore {
    async fn fetch_shots(&self, sql: &str, filter: Option<Uuid>) -> Result<Vec<ShotModel>, AppError> {
        let mut query = sqlx::query(sql);
        if let Some(value) = filter {
            query = query.bind(value);
        }

        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(store_error("Failed to fetch shots"))?;

        rows.iter()
            .map(shot_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_error("Failed to decode shot row"))
    }
}

#[async_trait]
impl ShotRepository for PostgresStore {
    #[instrument(skip(self, shot))]
    async fn insert_shot(&self, shot: &NewShot) -> Result<ShotModel, AppError> {
        let sql = format!(
            "INSERT INTO shots (player_id, game_id, made, cup_hit, type, timestamp) \
             VALUES ($1::uuid, $2::uuid, $3, $4, $5, $6) RETURNING {}",
            SHOT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&shot.player_id)
            .bind(&shot.game_id)
            .bind(shot.made)
            .bind(shot.cup_hit)
            .bind(shot.shot_type.as_ref())
            .bind(shot.timestamp)
            .fetch_one(self.pool())
            .await
            .map_err(store_error("Failed to insert shot"))?;

        let stored = shot_from_row(&row).map_err(store_error("Failed to decode inserted shot"))?;
        debug!(shot_id = %stored.id, game_id = %stored.game_id, "Shot stored in database");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn list_shots(&self) -> Result<Vec<ShotModel>, AppError> {
        let sql = format!("SELECT {} FROM shots ORDER BY timestamp", SHOT_COLUMNS);
        self.fetch_shots(&sql, None).await
    }

    #[instrument(skip(self))]
    async fn list_shots_for_player(&self, player_id: &str) -> Result<Vec<ShotModel>, AppError> {
        let Some(player_id) = parse_id(player_id) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {} FROM shots WHERE player_id = $1 ORDER BY timestamp",
            SHOT_COLUMNS
        );
        self.fetch_shots(&sql, Some(player_id)).await
    }

    #[instrument(skip(self))]
    async fn list_shots_for_game(&self, game_id: &str) -> Result<Vec<ShotModel>, AppError> {
        let Some(game_id) = parse_id(game_id) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {} FROM shots WHERE game_id = $1 ORDER BY timestamp",
            SHOT_COLUMNS
        );
        self.fetch_shots(&sql, Some(game_id)).await
    }
}
