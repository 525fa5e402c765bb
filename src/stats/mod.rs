// Shot aggregation: pure metric functions plus the service that feeds them
// from the store. Nothing here is cached; every view recomputes from the
// shots it is given.

pub mod breakdown;
pub mod compare;
pub mod heatmap;
pub mod metrics;
pub mod service;

mod handlers;

pub use breakdown::{player_card, PlayerCard, TypeBreakdown};
pub use compare::{compare_players, ComparisonMetric, PlayerComparison};
pub use handlers::{all_player_stats, compare_stats, player_stats};
pub use heatmap::{cup_heat_map, CupHeat, CupHeatMap};
pub use metrics::{bounce_pct, cup_hit_freq, shooting_pct, ShotRecord};
pub use service::{PlayerReport, StatsService};
