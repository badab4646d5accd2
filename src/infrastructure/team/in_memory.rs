//! In-memory team repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::team::{validate_team_name, Team, TeamId, TeamRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::InMemoryStore;

/// Team repository over the shared [`InMemoryStore`]
#[derive(Debug, Clone)]
pub struct InMemoryTeamRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryTeamRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, name: &str) -> Result<Team, DomainError> {
        validate_team_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut state = self.store.write()?;
        let id = state.next_team_id()?;
        let team = Team::new(id, name).map_err(|e| DomainError::validation(e.to_string()))?;

        state.teams.insert(id, team.clone());
        Ok(team)
    }

    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.store.read()?.teams.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let state = self.store.read()?;
        Ok(state.teams.values().find(|t| t.name() == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        Ok(self.store.read()?.teams.values().cloned().collect())
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let mut state = self.store.write()?;

        let Some(stored) = state.teams.get_mut(&team.id()) else {
            return Err(DomainError::not_found(format!("Team '{}' not found", team.id())));
        };

        *stored = team.clone();
        Ok(team.clone())
    }

    async fn delete(&self, id: TeamId) -> Result<bool, DomainError> {
        let mut state = self.store.write()?;

        if state.members.values().any(|m| m.team_id() == Some(id)) {
            return Err(DomainError::conflict(format!(
                "Team '{}' still has members",
                id
            )));
        }

        Ok(state.teams.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.store.read()?.teams.len() as u64)
    }
}
