use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{compare::PlayerComparison, service::PlayerReport};
use crate::shared::{split_ids, AppError, AppPath, AppQuery, AppState};

/// Query for a single player's report
#[derive(Debug, Deserialize)]
pub struct PlayerStatsQuery {
    /// Comma separated game ids; empty or absent means all games
    pub games: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub first: String,
    pub second: String,
}

/// GET /stats
#[instrument(name = "all_player_stats", skip(state))]
pub async fn all_player_stats(State(state): State<AppState>) -> Result<Json<Vec<PlayerReport>>, AppError> {
    let reports = state.stats_service.player_reports().await?;
    info!(report_count = reports.len(), "Player reports built");
    Ok(Json(reports))
}

/// GET /stats/players/:id?games=a,b
#[instrument(name = "player_stats", skip(state))]
pub async fn player_stats(
    State(state): State<AppState>,
    AppPath(player_id): AppPath<String>,
    AppQuery(query): AppQuery<PlayerStatsQuery>,
) -> Result<Json<PlayerReport>, AppError> {
    let selected = split_ids(query.games.as_deref());
    let report = state.stats_service.player_report(&player_id, &selected).await?;
    Ok(Json(report))
}

/// GET /stats/compare?first=..&second=..
#[instrument(name = "compare_stats", skip(state))]
pub async fn compare_stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompareQuery>,
) -> Result<Json<PlayerComparison>, AppError> {
    let comparison = state
        .stats_service
        .compare(&query.first, &query.second)
        .await?;
    Ok(Json(comparison))
}
