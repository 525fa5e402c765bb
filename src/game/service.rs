use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{GameModel, GameSetup, Teams},
    repository::GameRepository,
};
use crate::player::{repository::PlayerRepository, PlayerModel, PlayerService};
use crate::shared::AppError;
use crate::shot::{ShotModel, ShotRepository};

/// A freshly created game and its resolved teams
#[derive(Debug, Clone)]
pub struct StartedGame {
    pub game: GameModel,
    pub teams: Teams,
}

/// Everything needed to rebuild a session from the store
#[derive(Debug, Clone)]
pub struct ActiveGame {
    pub game: GameModel,
    pub teams: Teams,
    pub shots: Vec<ShotModel>,
}

/// Service for game lifecycle: start with a roster, end, and load the active game
pub struct GameService {
    players: PlayerService,
    games: Arc<dyn GameRepository>,
    shots: Arc<dyn ShotRepository>,
}

impl GameService {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        games: Arc<dyn GameRepository>,
        shots: Arc<dyn ShotRepository>,
    ) -> Self {
        Self {
            players: PlayerService::new(players),
            games,
            shots,
        }
    }

    /// Starts a new game: ends every other game, resolves player names,
    /// creates the game and stores its roster
    #[instrument(skip(self))]
    pub async fn start_game(&self, setup: &GameSetup) -> Result<StartedGame, AppError> {
        let setup = setup.normalized()?;

        let ended = self.games.set_all_games_inactive().await?;
        debug!(ended, "Previous games marked inactive");

        let players = try_join_all(
            setup
                .player_names()
                .map(|name| self.players.get_or_create_player_by_name(name)),
        )
        .await?;

        let game = self.games.create_game(&setup.name).await?;
        let player_ids: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
        self.games.add_players_to_game(&game.id, &player_ids).await?;

        let (team_one, team_two) = players.split_at(setup.team_one.len());
        let teams = [team_one.to_vec(), team_two.to_vec()];

        info!(
            game_id = %game.id,
            name = %game.name,
            roster_size = player_ids.len(),
            "Game started"
        );

        Ok(StartedGame { game, teams })
    }

    #[instrument(skip(self))]
    pub async fn end_game(&self, game_id: &str) -> Result<(), AppError> {
        self.games.end_game(game_id).await?;
        info!(game_id = %game_id, "Game ended");
        Ok(())
    }

    /// Loads the active game with its roster split into teams and its stored shots
    #[instrument(skip(self))]
    pub async fn load_active_game(&self) -> Result<Option<ActiveGame>, AppError> {
        let game = match self.games.get_active_game().await? {
            Some(game) => game,
            None => {
                debug!("No active game to load");
                return Ok(None);
            }
        };

        let roster = self.games.get_players_for_game(&game.id).await?;
        let shots = self.shots.list_shots_for_game(&game.id).await?;

        debug!(
            game_id = %game.id,
            roster_size = roster.len(),
            shot_count = shots.len(),
            "Active game loaded"
        );

        Ok(Some(ActiveGame {
            teams: split_roster(roster),
            game,
            shots,
        }))
    }
}

/// Splits a stored roster into two teams by order: the first half (rounded
/// up) and the rest. The roster table does not record team membership.
pub fn split_roster(mut roster: Vec<PlayerModel>) -> Teams {
    let mid = roster.len().div_ceil(2);
    let team_two = roster.split_off(mid);
    [roster, team_two]
}
