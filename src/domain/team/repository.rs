//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use crate::domain::DomainError;

/// Repository for managing teams
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Persist a new team and return it with its generated ID
    async fn create(&self, name: &str) -> Result<Team, DomainError>;

    /// Get a team by ID
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Get a team by its exact name
    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, DomainError>;

    /// List all teams ordered by ID
    async fn list(&self) -> Result<Vec<Team>, DomainError>;

    /// Rename an existing team
    async fn update(&self, team: &Team) -> Result<Team, DomainError>;

    /// Delete a team by ID.
    ///
    /// Fails with a conflict while members still reference the team.
    async fn delete(&self, id: TeamId) -> Result<bool, DomainError>;

    /// Count all teams
    async fn count(&self) -> Result<u64, DomainError>;

    /// Check if a team exists
    async fn exists(&self, id: TeamId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
