//! Aggregation endpoints

use axum::{extract::State, Json};

use crate::api::members::{validate_params, MemberSearchParams};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Query};
use crate::domain::search::{AgeStatistics, TeamAgeStatistics};

/// GET /v1/members/statistics
pub async fn member_statistics(
    State(state): State<AppState>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<AgeStatistics>, ApiError> {
    validate_params(&params)?;

    let statistics = state
        .search_service
        .member_statistics(&params.condition())
        .await?;

    Ok(Json(statistics))
}

/// GET /v1/teams/statistics
pub async fn team_statistics(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamAgeStatistics>>, ApiError> {
    Ok(Json(state.search_service.team_statistics().await?))
}
