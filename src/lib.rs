//! Member Search API
//!
//! Dynamic member/team queries over PostgreSQL or an in-memory store:
//! - optional filters composed into a single conjunction
//! - three pagination strategies with a count-skip optimization
//! - age statistics and bulk member updates

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::seed::seed_sample_data;
use infrastructure::storage::StorageFactory;

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = StorageFactory::create(&config.storage, &config.pagination).await?;

    if config.seed.enabled {
        seed_sample_data(
            repositories.teams.as_ref(),
            repositories.members.as_ref(),
            &config.seed,
        )
        .await?;
    }

    Ok(AppState::from_repositories(
        &repositories,
        config.pagination.clone(),
    ))
}
