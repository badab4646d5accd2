//! In-memory member repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::member::{Member, MemberDraft, MemberId, MemberRepository};
use crate::domain::team::TeamId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryStore, StoreState};

/// Member repository over the shared [`InMemoryStore`]
#[derive(Debug, Clone)]
pub struct InMemoryMemberRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryMemberRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

fn ensure_team(state: &StoreState, team_id: Option<TeamId>) -> Result<(), DomainError> {
    match team_id {
        Some(id) if !state.teams.contains_key(&id) => {
            Err(DomainError::not_found(format!("Team '{}' not found", id)))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn create(&self, draft: MemberDraft) -> Result<Member, DomainError> {
        let mut state = self.store.write()?;
        ensure_team(&state, draft.team_id())?;

        let id = state.next_member_id()?;
        let member = draft.into_member(id);

        state.members.insert(id, member.clone());
        Ok(member)
    }

    async fn get(&self, id: MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self.store.read()?.members.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Member>, DomainError> {
        Ok(self.store.read()?.members.values().cloned().collect())
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError> {
        let state = self.store.read()?;

        Ok(state
            .members
            .values()
            .filter(|m| m.username() == Some(username))
            .cloned()
            .collect())
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Member>, DomainError> {
        let state = self.store.read()?;

        Ok(state
            .members
            .values()
            .filter(|m| m.team_id() == Some(team_id))
            .cloned()
            .collect())
    }

    async fn update(&self, member: &Member) -> Result<Member, DomainError> {
        let mut state = self.store.write()?;
        ensure_team(&state, member.team_id())?;

        let Some(stored) = state.members.get_mut(&member.id()) else {
            return Err(DomainError::not_found(format!(
                "Member '{}' not found",
                member.id()
            )));
        };

        *stored = member.clone();
        Ok(member.clone())
    }

    async fn delete(&self, id: MemberId) -> Result<bool, DomainError> {
        Ok(self.store.write()?.members.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.store.read()?.members.len() as u64)
    }
}
