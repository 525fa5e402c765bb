use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::state::GameSession;
use crate::game::{GameService, GameSetup, Teams};
use crate::player::PlayerModel;
use crate::shared::AppError;
use crate::shot::{ShotDraft, ShotError, ShotModel, ShotRepository};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("No game is in progress")]
    NoActiveGame,

    #[error("Select a player before logging a shot")]
    NoPlayerSelected,

    #[error("Player {0} is not playing in the current game")]
    PlayerNotInGame(String),

    #[error("The current game already has shots; confirm to start a new one")]
    ConfirmationRequired,

    #[error(transparent)]
    InvalidShot(#[from] ShotError),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        let message = err.to_string();
        match err {
            TrackerError::Store(inner) => inner,
            TrackerError::ConfirmationRequired | TrackerError::NoActiveGame => {
                AppError::Conflict(message)
            }
            TrackerError::NoPlayerSelected
            | TrackerError::PlayerNotInGame(_)
            | TrackerError::InvalidShot(_) => AppError::Validation(message),
        }
    }
}

/// Answer to "may a new game start right now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewGamePrompt {
    Proceed,
    /// Starting would abandon a game that already has shots
    ConfirmationRequired,
}

/// Drives a `GameSession` against the store: rebuilds it from the active
/// game, starts and ends games, and logs shots optimistically.
pub struct GameTracker {
    session: GameSession,
    games: Arc<GameService>,
    shots: Arc<dyn ShotRepository>,
}

impl GameTracker {
    pub fn new(games: Arc<GameService>, shots: Arc<dyn ShotRepository>) -> Self {
        Self {
            session: GameSession::new(),
            games,
            shots,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Throws away local state and reloads the active game from the store
    #[instrument(skip(self))]
    pub async fn rehydrate(&mut self) -> Result<(), TrackerError> {
        self.session.reset();

        let Some(active) = self.games.load_active_game().await? else {
            info!("No active game, session left empty");
            return Ok(());
        };

        let first_player = first_player(&active.teams);
        self.session.set_current_game_id(active.game.id.clone());
        self.session.set_teams(active.teams);
        if let Some(player) = first_player {
            self.session.set_selected_player(player);
        }
        // Stored shots are already persisted
        for shot in active.shots {
            let id = shot.id.clone();
            self.session.add_shot(shot);
            self.session.mark_shot_confirmed(&id);
        }

        info!(
            game_id = %active.game.id,
            shot_count = self.session.shots().len(),
            "Session rehydrated"
        );
        Ok(())
    }

    pub fn new_game_prompt(&self) -> NewGamePrompt {
        if self.session.current_game_id().is_some() && !self.session.shots().is_empty() {
            NewGamePrompt::ConfirmationRequired
        } else {
            NewGamePrompt::Proceed
        }
    }

    #[instrument(skip(self))]
    pub async fn start_game(&mut self, setup: &GameSetup, confirmed: bool) -> Result<(), TrackerError> {
        if self.new_game_prompt() == NewGamePrompt::ConfirmationRequired && !confirmed {
            warn!(
                game_id = ?self.session.current_game_id(),
                "New game refused without confirmation"
            );
            return Err(TrackerError::ConfirmationRequired);
        }

        let started = self.games.start_game(setup).await?;

        let first_player = first_player(&started.teams);
        self.session.set_teams(started.teams);
        self.session.set_current_game_id(started.game.id);
        self.session.reset_shots();
        match first_player {
            Some(player) => self.session.set_selected_player(player),
            None => self.session.clear_selected_player(),
        }
        Ok(())
    }

    /// Ends the current game and reloads whatever is still active
    #[instrument(skip(self))]
    pub async fn end_game(&mut self) -> Result<(), TrackerError> {
        let game_id = self
            .session
            .current_game_id()
            .map(str::to_string)
            .ok_or(TrackerError::NoActiveGame)?;

        self.games.end_game(&game_id).await?;
        self.rehydrate().await
    }

    #[instrument(skip(self))]
    pub fn select_player(&mut self, player_id: &str) -> Result<&PlayerModel, TrackerError> {
        let player = self
            .session
            .roster_player(player_id)
            .cloned()
            .ok_or_else(|| TrackerError::PlayerNotInGame(player_id.to_string()))?;

        debug!(player_id = %player.id, name = %player.name, "Player selected");
        self.session.set_selected_player(player);
        self.session
            .selected_player()
            .ok_or(TrackerError::NoPlayerSelected)
    }

    /// Logs a shot for the selected player.
    ///
    /// The shot is appended to the session under a local id before the store
    /// write. On success the stored shot, with the id the store assigned, is
    /// returned; the local copy keeps its id until the next rehydrate. On
    /// failure it stays there unconfirmed.
    #[instrument(skip(self))]
    pub async fn log_shot(&mut self, draft: ShotDraft) -> Result<ShotModel, TrackerError> {
        let game_id = self
            .session
            .current_game_id()
            .map(str::to_string)
            .ok_or(TrackerError::NoActiveGame)?;
        let player_id = self
            .session
            .selected_player()
            .map(|p| p.id.clone())
            .ok_or(TrackerError::NoPlayerSelected)?;
        if self.session.team_for_player(&player_id).is_none() {
            return Err(TrackerError::PlayerNotInGame(player_id));
        }

        let new_shot = draft.into_new_shot(&player_id, &game_id, Utc::now())?;
        let local_id = Uuid::new_v4().to_string();
        self.session
            .add_shot(new_shot.clone().into_model(local_id.clone()));

        match self.shots.insert_shot(&new_shot).await {
            Ok(stored) => {
                self.session.mark_shot_confirmed(&local_id);
                info!(
                    shot_id = %stored.id,
                    player_id = %player_id,
                    shot_type = %stored.shot_type,
                    made = stored.made,
                    "Shot logged"
                );
                Ok(stored)
            }
            Err(err) => {
                error!(
                    local_id = %local_id,
                    error = %err,
                    "Shot write failed, keeping unconfirmed local copy"
                );
                Err(TrackerError::Store(err))
            }
        }
    }
}

fn first_player(teams: &Teams) -> Option<PlayerModel> {
    teams.iter().flatten().next().cloned()
}
