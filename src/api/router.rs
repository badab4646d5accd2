use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::health;
use super::members;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::statistics;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Member search, one pagination strategy per version
        .route("/v1/members", get(members::list_members))
        .route("/v2/members", get(members::search_members_simple))
        .route("/v3/members", get(members::search_members_complex))
        .route("/v4/members", get(members::search_members_optimized))
        // Aggregations
        .route("/v1/members/statistics", get(statistics::member_statistics))
        .route("/v1/teams/statistics", get(statistics::team_statistics))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware)),
        )
}
