use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::game::Teams;
use crate::player::PlayerModel;
use crate::shot::ShotModel;

/// In-memory state of the game being tracked: teams, the player about to
/// shoot, the shots logged so far and the current game id.
///
/// Shots are appended before the store confirms them. Unconfirmed ids stay
/// listed until `mark_shot_confirmed` is called.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    teams: Teams,
    selected_player: Option<PlayerModel>,
    shots: Vec<ShotModel>,
    current_game_id: Option<String>,
    unconfirmed: HashSet<String>,
}

/// Serializable view of a session for the HTTP layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current_game_id: Option<String>,
    pub teams: Teams,
    pub selected_player: Option<PlayerModel>,
    pub shots: Vec<ShotModel>,
    pub unconfirmed_shot_ids: Vec<String>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn selected_player(&self) -> Option<&PlayerModel> {
        self.selected_player.as_ref()
    }

    pub fn shots(&self) -> &[ShotModel] {
        &self.shots
    }

    pub fn current_game_id(&self) -> Option<&str> {
        self.current_game_id.as_deref()
    }

    pub fn set_teams(&mut self, teams: Teams) {
        self.teams = teams;
    }

    pub fn set_selected_player(&mut self, player: PlayerModel) {
        self.selected_player = Some(player);
    }

    pub fn clear_selected_player(&mut self) {
        self.selected_player = None;
    }

    /// Appends a shot as tentative
    pub fn add_shot(&mut self, shot: ShotModel) {
        self.unconfirmed.insert(shot.id.clone());
        self.shots.push(shot);
    }

    /// Marks a tentative shot as persisted. Unknown ids are ignored.
    pub fn mark_shot_confirmed(&mut self, shot_id: &str) {
        self.unconfirmed.remove(shot_id);
    }

    pub fn is_confirmed(&self, shot_id: &str) -> bool {
        !self.unconfirmed.contains(shot_id)
    }

    /// Ids of shots still waiting on the store, in logging order
    pub fn unconfirmed_shot_ids(&self) -> Vec<String> {
        self.shots
            .iter()
            .filter(|shot| self.unconfirmed.contains(&shot.id))
            .map(|shot| shot.id.clone())
            .collect()
    }

    pub fn set_current_game_id(&mut self, game_id: impl Into<String>) {
        self.current_game_id = Some(game_id.into());
    }

    pub fn clear_current_game_id(&mut self) {
        self.current_game_id = None;
    }

    pub fn reset_shots(&mut self) {
        self.shots.clear();
        self.unconfirmed.clear();
    }

    /// Back to the empty state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Index of the team a player is on, if any
    pub fn team_for_player(&self, player_id: &str) -> Option<usize> {
        self.teams
            .iter()
            .position(|team| team.iter().any(|p| p.id == player_id))
    }

    pub fn roster_player(&self, player_id: &str) -> Option<&PlayerModel> {
        self.teams.iter().flatten().find(|p| p.id == player_id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_game_id: self.current_game_id.clone(),
            teams: self.teams.clone(),
            selected_player: self.selected_player.clone(),
            shots: self.shots.clone(),
            unconfirmed_shot_ids: self.unconfirmed_shot_ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::ShotType;
    use chrono::Utc;

    fn shot(id: &str) -> ShotModel {
        ShotModel {
            id: id.to_string(),
            player_id: "p1".to_string(),
            game_id: "g1".to_string(),
            made: true,
            cup_hit: Some(3),
            shot_type: ShotType::Throw,
            timestamp: Utc::now(),
        }
    }

    fn teams() -> Teams {
        [
            vec![PlayerModel::new("p1", "alice")],
            vec![PlayerModel::new("p2", "bob")],
        ]
    }

    #[test]
    fn added_shots_stay_unconfirmed_until_marked() {
        let mut session = GameSession::new();
        session.add_shot(shot("a"));
        session.add_shot(shot("b"));

        assert_eq!(session.unconfirmed_shot_ids(), vec!["a", "b"]);

        session.mark_shot_confirmed("a");
        session.mark_shot_confirmed("missing");

        assert!(session.is_confirmed("a"));
        assert!(!session.is_confirmed("b"));
        assert_eq!(session.shots().len(), 2);
        assert_eq!(session.snapshot().unconfirmed_shot_ids, vec!["b"]);
    }

    #[test]
    fn team_lookup_uses_roster() {
        let mut session = GameSession::new();
        session.set_teams(teams());

        assert_eq!(session.team_for_player("p1"), Some(0));
        assert_eq!(session.team_for_player("p2"), Some(1));
        assert_eq!(session.team_for_player("p3"), None);
        assert_eq!(session.roster_player("p2").unwrap().name, "bob");
    }

    #[test]
    fn reset_shots_keeps_teams_and_reset_clears_everything() {
        let mut session = GameSession::new();
        session.set_teams(teams());
        session.set_selected_player(PlayerModel::new("p1", "alice"));
        session.set_current_game_id("g1");
        session.add_shot(shot("a"));

        session.reset_shots();
        assert!(session.shots().is_empty());
        assert!(session.unconfirmed_shot_ids().is_empty());
        assert_eq!(session.current_game_id(), Some("g1"));

        session.reset();
        assert!(session.selected_player().is_none());
        assert!(session.current_game_id().is_none());
        assert!(session.teams().iter().all(Vec::is_empty));
    }

    #[test]
    fn clearing_selection_and_game_id() {
        let mut session = GameSession::new();
        session.set_selected_player(PlayerModel::new("p1", "alice"));
        session.set_current_game_id("g1");

        session.clear_selected_player();
        session.clear_current_game_id();

        assert!(session.selected_player().is_none());
        assert!(session.current_game_id().is_none());
    }
}
