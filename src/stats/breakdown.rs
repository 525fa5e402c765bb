use serde::{Deserialize, Serialize};

use super::metrics::percentage;
use crate::player::PlayerModel;
use crate::shot::{ShotModel, ShotType};

/// Made and attempted counts for one shot type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub made: u32,
    pub total: u32,
    pub pct: f64,
    /// `pct` to one decimal, "0.0" when nothing was attempted
    pub formatted_pct: String,
}

impl TypeBreakdown {
    pub fn of(shots: &[&ShotModel], shot_type: ShotType) -> Self {
        let of_type: Vec<&&ShotModel> = shots.iter().filter(|s| s.shot_type == shot_type).collect();
        let made = of_type.iter().filter(|s| s.made).count();
        let pct = percentage(made, of_type.len());

        Self {
            made: made as u32,
            total: of_type.len() as u32,
            pct,
            formatted_pct: format!("{:.1}", pct),
        }
    }
}

/// Per-type shooting summary for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCard {
    pub player: PlayerModel,
    pub total_shots: u32,
    pub throw: TypeBreakdown,
    pub bounce: TypeBreakdown,
    pub last_cup: TypeBreakdown,
}

impl PlayerCard {
    pub fn by_type(&self, shot_type: ShotType) -> &TypeBreakdown {
        match shot_type {
            ShotType::Throw => &self.throw,
            ShotType::Bounce => &self.bounce,
            ShotType::LastCup => &self.last_cup,
        }
    }
}

/// The player's shots, limited to `selected_game_ids` unless that is empty
pub fn player_shots<'a>(
    player_id: &str,
    shots: &'a [ShotModel],
    selected_game_ids: &[String],
) -> Vec<&'a ShotModel> {
    shots
        .iter()
        .filter(|s| s.player_id == player_id)
        .filter(|s| selected_game_ids.is_empty() || selected_game_ids.contains(&s.game_id))
        .collect()
}

pub fn player_card(player: &PlayerModel, shots: &[ShotModel], selected_game_ids: &[String]) -> PlayerCard {
    let shots = player_shots(&player.id, shots, selected_game_ids);

    PlayerCard {
        player: player.clone(),
        total_shots: shots.len() as u32,
        throw: TypeBreakdown::of(&shots, ShotType::Throw),
        bounce: TypeBreakdown::of(&shots, ShotType::Bounce),
        last_cup: TypeBreakdown::of(&shots, ShotType::LastCup),
    }
}
