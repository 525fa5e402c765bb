use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use validator::Validate;

use crate::player::models::PlayerModel;
use crate::shared::AppError;

/// Two ordered teams of players
pub type Teams = [Vec<PlayerModel>; 2];

/// Database model for the games table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GameModel {
    pub id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub active: bool, // at most one game is active at a time
}

impl GameModel {
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            started_at: self.started_at,
        }
    }
}

/// Game as listed in a player's game filter
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
}

/// Request payload for starting a game: a display name and the player names
/// of each team (1v1 or 2v2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GameSetup {
    #[validate(length(min = 1, max = 100, message = "Game name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 2, message = "Teams have one or two players"))]
    pub team_one: Vec<String>,
    #[validate(length(min = 1, max = 2, message = "Teams have one or two players"))]
    pub team_two: Vec<String>,
}

impl GameSetup {
    pub fn new(name: &str, team_one: &[&str], team_two: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            team_one: team_one.iter().map(|n| n.to_string()).collect(),
            team_two: team_two.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Trims every name and checks the setup describes a playable game
    pub fn normalized(&self) -> Result<GameSetup, AppError> {
        let trim_all = |names: &[String]| -> Vec<String> {
            names.iter().map(|n| n.trim().to_string()).collect()
        };
        let setup = GameSetup {
            name: self.name.trim().to_string(),
            team_one: trim_all(&self.team_one),
            team_two: trim_all(&self.team_two),
        };

        setup
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if setup.team_one.len() != setup.team_two.len() {
            return Err(AppError::Validation(
                "Both teams must have the same number of players".to_string(),
            ));
        }

        setup.check_player_names()?;

        Ok(setup)
    }

    fn check_player_names(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for name in self.player_names() {
            if name.is_empty() {
                return Err(AppError::Validation("Player names are required".to_string()));
            }
            if !seen.insert(name) {
                return Err(AppError::Validation(format!(
                    "Player '{}' appears more than once",
                    name
                )));
            }
        }
        Ok(())
    }

    /// All player names, team one first
    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.team_one
            .iter()
            .chain(self.team_two.iter())
            .map(String::as_str)
    }
}
