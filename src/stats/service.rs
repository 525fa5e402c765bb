use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{
    breakdown::{player_card, player_shots, PlayerCard},
    compare::{compare_players, PlayerComparison},
    heatmap::{cup_heat_map, CupHeatMap},
    metrics::cup_hit_freq,
};
use crate::game::{GameRepository, GameSummary};
use crate::player::{PlayerModel, PlayerRepository};
use crate::shared::AppError;
use crate::shot::{ShotModel, ShotRepository};

/// What the stats view shows for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub card: PlayerCard,
    /// Made shots per cup
    pub cup_hits: BTreeMap<i32, u32>,
    pub heat_map: CupHeatMap,
}

impl PlayerReport {
    /// Builds the report from any shot list; the player and game filters are
    /// applied here
    pub fn build(player: &PlayerModel, shots: &[ShotModel], selected_game_ids: &[String]) -> Self {
        let made: Vec<&ShotModel> = player_shots(&player.id, shots, selected_game_ids)
            .into_iter()
            .filter(|s| s.made && s.cup_hit.is_some())
            .collect();
        let cup_hits = cup_hit_freq(&made);

        Self {
            card: player_card(player, shots, selected_game_ids),
            heat_map: cup_heat_map(&cup_hits),
            cup_hits,
        }
    }
}

/// Service that fetches shots fresh from the store and aggregates them
pub struct StatsService {
    players: Arc<dyn PlayerRepository>,
    games: Arc<dyn GameRepository>,
    shots: Arc<dyn ShotRepository>,
}

impl StatsService {
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        games: Arc<dyn GameRepository>,
        shots: Arc<dyn ShotRepository>,
    ) -> Self {
        Self {
            players,
            games,
            shots,
        }
    }

    /// Reports for every player over all games
    #[instrument(skip(self))]
    pub async fn player_reports(&self) -> Result<Vec<PlayerReport>, AppError> {
        let players = self.players.list_players().await?;
        let shots = self.shots.list_shots().await?;

        debug!(
            player_count = players.len(),
            shot_count = shots.len(),
            "Building player reports"
        );

        Ok(players
            .iter()
            .map(|player| PlayerReport::build(player, &shots, &[]))
            .collect())
    }

    /// Report for one player, limited to `selected_game_ids` when non-empty
    #[instrument(skip(self))]
    pub async fn player_report(
        &self,
        player_id: &str,
        selected_game_ids: &[String],
    ) -> Result<PlayerReport, AppError> {
        let player = self.require_player(player_id).await?;
        let shots = self.shots.list_shots_for_player(player_id).await?;
        Ok(PlayerReport::build(&player, &shots, selected_game_ids))
    }

    #[instrument(skip(self))]
    pub async fn games_for_player(&self, player_id: &str) -> Result<Vec<GameSummary>, AppError> {
        self.require_player(player_id).await?;
        self.games.get_games_for_player(player_id).await
    }

    /// Head-to-head comparison of two different players
    #[instrument(skip(self))]
    pub async fn compare(&self, first_id: &str, second_id: &str) -> Result<PlayerComparison, AppError> {
        if first_id == second_id {
            warn!(player_id = %first_id, "Comparison requested for the same player twice");
            return Err(AppError::Validation(
                "Select two different players to compare".to_string(),
            ));
        }

        let first = self.require_player(first_id).await?;
        let second = self.require_player(second_id).await?;
        let first_shots = self.shots.list_shots_for_player(first_id).await?;
        let second_shots = self.shots.list_shots_for_player(second_id).await?;

        Ok(compare_players(&first, &first_shots, &second, &second_shots))
    }

    async fn require_player(&self, player_id: &str) -> Result<PlayerModel, AppError> {
        self.players
            .get_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {} not found", player_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use crate::shot::{NewShot, ShotType};
    use chrono::Utc;

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: StatsService,
        alice: PlayerModel,
        bob: PlayerModel,
        first_game: String,
        second_game: String,
    }

    async fn log(store: &InMemoryStore, player: &PlayerModel, game_id: &str, shot_type: ShotType, made: bool, cup_hit: Option<i32>) {
        store
            .insert_shot(&NewShot {
                player_id: player.id.clone(),
                game_id: game_id.to_string(),
                made,
                cup_hit,
                shot_type,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let service = StatsService::new(store.clone(), store.clone(), store.clone());
        let alice = store.create_player("alice").await.unwrap();
        let bob = store.create_player("bob").await.unwrap();
        let first_game = store.create_game("first").await.unwrap().id;
        let second_game = store.create_game("second").await.unwrap().id;

        log(&store, &alice, &first_game, ShotType::Throw, true, Some(1)).await;
        log(&store, &alice, &first_game, ShotType::Bounce, false, None).await;
        log(&store, &alice, &second_game, ShotType::Bounce, true, Some(2)).await;
        log(&store, &alice, &second_game, ShotType::Throw, false, None).await;
        log(&store, &alice, &second_game, ShotType::Throw, true, Some(1)).await;
        log(&store, &alice, &second_game, ShotType::LastCup, false, Some(11)).await;
        log(&store, &bob, &first_game, ShotType::Throw, false, None).await;

        Fixture {
            store,
            service,
            alice,
            bob,
            first_game,
            second_game,
        }
    }

    #[tokio::test]
    async fn report_counts_only_made_cup_hits() {
        let f = fixture().await;

        let report = f.service.player_report(&f.alice.id, &[]).await.unwrap();

        assert_eq!(report.card.total_shots, 6);
        assert_eq!(report.cup_hits, BTreeMap::from([(1, 2), (2, 1)]));
        assert_eq!(report.heat_map.cup(1).unwrap().intensity, 1.0);
    }

    #[tokio::test]
    async fn report_respects_game_selection() {
        let f = fixture().await;

        let report = f
            .service
            .player_report(&f.alice.id, &[f.first_game.clone()])
            .await
            .unwrap();

        assert_eq!(report.card.total_shots, 2);
        assert_eq!(report.cup_hits, BTreeMap::from([(1, 1)]));
    }

    #[tokio::test]
    async fn reports_cover_every_player() {
        let f = fixture().await;

        let reports = f.service.player_reports().await.unwrap();

        assert_eq!(reports.len(), 2);
        let bob = reports.iter().find(|r| r.card.player.id == f.bob.id).unwrap();
        assert_eq!(bob.card.total_shots, 1);
        assert!(bob.cup_hits.is_empty());
        assert_eq!(f.store.shot_count(), 7);
    }

    #[tokio::test]
    async fn games_for_player_lists_games_with_shots() {
        let f = fixture().await;

        let alice_games = f.service.games_for_player(&f.alice.id).await.unwrap();
        let ids: Vec<&str> = alice_games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec![f.first_game.as_str(), f.second_game.as_str()]);

        let bob_games = f.service.games_for_player(&f.bob.id).await.unwrap();
        assert_eq!(bob_games.len(), 1);
    }

    #[tokio::test]
    async fn compare_requires_two_known_players() {
        let f = fixture().await;

        let same = f.service.compare(&f.alice.id, &f.alice.id).await;
        assert!(matches!(same, Err(AppError::Validation(_))));

        let missing = f.service.compare(&f.alice.id, "nobody").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let comparison = f.service.compare(&f.alice.id, &f.bob.id).await.unwrap();
        // alice: 5 rack shots, 3 made, 2 bounces
        assert_eq!(comparison.metrics[0].first, 60.0);
        assert_eq!(comparison.metrics[1].first, 40.0);
        assert_eq!(comparison.metrics[0].second, 0.0);
    }
}
