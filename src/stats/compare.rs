use serde::{Deserialize, Serialize};

use super::breakdown::{player_card, PlayerCard};
use super::metrics::{bounce_pct, shooting_pct};
use crate::player::PlayerModel;
use crate::shot::{ShotModel, ShotType};

/// One metric measured for both players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetric {
    pub name: String,
    pub first: f64,
    pub second: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub first: PlayerCard,
    pub second: PlayerCard,
    pub metrics: Vec<ComparisonMetric>,
}

/// Final-cup attempts are left out of the head-to-head metrics
fn rack_shots(shots: &[ShotModel]) -> Vec<&ShotModel> {
    shots
        .iter()
        .filter(|s| matches!(s.shot_type, ShotType::Throw | ShotType::Bounce))
        .collect()
}

/// Compares two players' shooting and bounce percentages over their
/// throw and bounce shots. Each side's shots should already belong to that
/// player.
pub fn compare_players(
    first: &PlayerModel,
    first_shots: &[ShotModel],
    second: &PlayerModel,
    second_shots: &[ShotModel],
) -> PlayerComparison {
    let first_rack = rack_shots(first_shots);
    let second_rack = rack_shots(second_shots);

    let metrics = vec![
        ComparisonMetric {
            name: "Shooting %".to_string(),
            first: shooting_pct(&first_rack),
            second: shooting_pct(&second_rack),
        },
        ComparisonMetric {
            name: "Bounce %".to_string(),
            first: bounce_pct(&first_rack),
            second: bounce_pct(&second_rack),
        },
    ];

    PlayerComparison {
        first: player_card(first, first_shots, &[]),
        second: player_card(second, second_shots, &[]),
        metrics,
    }
}
