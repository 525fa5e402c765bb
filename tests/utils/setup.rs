use std::sync::Arc;

use pongstats::game::GameService;
use pongstats::stats::StatsService;
use pongstats::{GameSetup, GameTracker, InMemoryStore, PlayerModel};

use super::mocks::FlakyShotStore;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub store: Arc<InMemoryStore>,
    pub shot_store: Arc<FlakyShotStore>,
    pub game_service: Arc<GameService>,
    pub stats_service: StatsService,
    pub tracker: GameTracker,
}

impl TestSetup {
    pub fn player(&self, name: &str) -> PlayerModel {
        self.tracker
            .session()
            .teams()
            .iter()
            .flatten()
            .find(|p| p.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("{} is not on the current teams", name))
    }

    pub fn current_game_id(&self) -> String {
        self.tracker
            .session()
            .current_game_id()
            .expect("a game should be in progress")
            .to_string()
    }
}

pub struct TestSetupBuilder {
    game: Option<GameSetup>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { game: None }
    }

    pub fn with_game(mut self, name: &str, team_one: &[&str], team_two: &[&str]) -> Self {
        self.game = Some(GameSetup::new(name, team_one, team_two));
        self
    }

    pub fn with_one_on_one(self) -> Self {
        self.with_game("singles", &["alice"], &["bob"])
    }

    pub fn with_two_on_two(self) -> Self {
        self.with_game("doubles", &["alice", "bob"], &["carol", "dave"])
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryStore::new());
        let shot_store = Arc::new(FlakyShotStore::new(store.clone()));
        let game_service = Arc::new(GameService::new(
            store.clone(),
            store.clone(),
            shot_store.clone(),
        ));
        let stats_service = StatsService::new(store.clone(), store.clone(), store.clone());
        let mut tracker = GameTracker::new(game_service.clone(), shot_store.clone());

        if let Some(game) = &self.game {
            tracker
                .start_game(game, false)
                .await
                .expect("game should start");
        }

        TestSetup {
            store,
            shot_store,
            game_service,
            stats_service,
            tracker,
        }
    }
}
