//! Shared in-memory store for teams and members

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::member::{Member, MemberId};
use crate::domain::search::MemberTeamDto;
use crate::domain::team::{Team, TeamId};
use crate::domain::DomainError;

/// Tables and identity sequences behind the in-memory repositories
#[derive(Debug)]
pub struct StoreState {
    pub teams: BTreeMap<TeamId, Team>,
    pub members: BTreeMap<MemberId, Member>,
    next_team_id: i64,
    next_member_id: i64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            teams: BTreeMap::new(),
            members: BTreeMap::new(),
            next_team_id: 1,
            next_member_id: 1,
        }
    }
}

impl StoreState {
    pub fn next_team_id(&mut self) -> Result<TeamId, DomainError> {
        let id = TeamId::new(self.next_team_id)
            .map_err(|e| DomainError::internal(format!("Team sequence exhausted: {}", e)))?;
        self.next_team_id += 1;
        Ok(id)
    }

    pub fn next_member_id(&mut self) -> Result<MemberId, DomainError> {
        let id = MemberId::new(self.next_member_id)
            .map_err(|e| DomainError::internal(format!("Member sequence exhausted: {}", e)))?;
        self.next_member_id += 1;
        Ok(id)
    }

    /// Project a member through a left outer join on its team
    pub fn project(&self, member: &Member) -> MemberTeamDto {
        let team = member.team_id().and_then(|id| self.teams.get(&id));

        MemberTeamDto::new(
            member.id(),
            member.username().map(String::from),
            member.age(),
            team.map(Team::id),
            team.map(|t| t.name().to_string()),
        )
    }

    /// Every member joined with its team, in member ID order
    pub fn joined_rows(&self) -> Vec<MemberTeamDto> {
        self.members.values().map(|m| self.project(m)).collect()
    }
}

/// Thread-safe in-memory store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_start_at_one() {
        let store = InMemoryStore::new();
        let mut state = store.write().unwrap();

        assert_eq!(state.next_team_id().unwrap().value(), 1);
        assert_eq!(state.next_team_id().unwrap().value(), 2);
        assert_eq!(state.next_member_id().unwrap().value(), 1);
    }

    #[test]
    fn test_projection_left_joins_team() {
        let store = InMemoryStore::new();
        let mut state = store.write().unwrap();

        let team_id = state.next_team_id().unwrap();
        state
            .teams
            .insert(team_id, Team::new(team_id, "teamA").unwrap());

        let with_team = Member::restore(
            state.next_member_id().unwrap(),
            Some("member1".to_string()),
            10,
            Some(team_id),
        )
        .unwrap();
        let without_team =
            Member::restore(state.next_member_id().unwrap(), None, 20, None).unwrap();
        state.members.insert(with_team.id(), with_team);
        state.members.insert(without_team.id(), without_team);

        let rows = state.joined_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team_name.as_deref(), Some("teamA"));
        assert_eq!(rows[0].team_id, Some(team_id));
        assert!(rows[1].team_id.is_none());
        assert!(rows[1].team_name.is_none());
    }
}
