//! In-memory member query repository

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::search::{
    AgeStatistics, Conjunction, MemberQueryRepository, MemberTeamDto, Sort, TeamAgeStatistics,
};
use crate::domain::team::TeamId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{InMemoryStore, StoreState};

/// Evaluates conjunctions and orderings over the shared [`InMemoryStore`]
/// with the same semantics as the SQL implementation.
#[derive(Debug, Clone)]
pub struct InMemoryMemberQueryRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryMemberQueryRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    fn matching(state: &StoreState, conjunction: &Conjunction) -> Vec<MemberTeamDto> {
        state
            .joined_rows()
            .into_iter()
            .filter(|row| conjunction.matches(row))
            .collect()
    }

    fn sorted(&self, conjunction: &Conjunction, sort: &Sort) -> Result<Vec<MemberTeamDto>, DomainError> {
        let state = self.store.read()?;
        let mut rows = Self::matching(&state, conjunction);
        rows.sort_by(|a, b| sort.compare(a, b));
        Ok(rows)
    }
}

fn slice(rows: Vec<MemberTeamDto>, offset: u64, limit: u64) -> Vec<MemberTeamDto> {
    let offset = usize::try_from(offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);

    rows.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl MemberQueryRepository for InMemoryMemberQueryRepository {
    async fn search(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        self.sorted(conjunction, sort)
    }

    async fn fetch_slice(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        Ok(slice(self.sorted(conjunction, sort)?, offset, limit))
    }

    async fn fetch_slice_with_total(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<MemberTeamDto>, u64), DomainError> {
        let rows = self.sorted(conjunction, sort)?;
        let total = rows.len() as u64;

        Ok((slice(rows, offset, limit), total))
    }

    async fn count(&self, conjunction: &Conjunction) -> Result<u64, DomainError> {
        let state = self.store.read()?;

        Ok(state
            .members
            .values()
            .filter(|m| conjunction.matches(&state.project(m)))
            .count() as u64)
    }

    async fn age_statistics(
        &self,
        conjunction: &Conjunction,
    ) -> Result<AgeStatistics, DomainError> {
        let state = self.store.read()?;
        let rows = Self::matching(&state, conjunction);

        Ok(AgeStatistics::from_ages(rows.iter().map(|r| r.age)))
    }

    async fn team_statistics(&self) -> Result<Vec<TeamAgeStatistics>, DomainError> {
        let state = self.store.read()?;
        let mut ages: BTreeMap<TeamId, (u64, i64)> = BTreeMap::new();

        for member in state.members.values() {
            if let Some(team_id) = member.team_id() {
                let entry = ages.entry(team_id).or_default();
                entry.0 += 1;
                entry.1 += i64::from(member.age());
            }
        }

        let mut statistics: Vec<TeamAgeStatistics> = ages
            .into_iter()
            .filter_map(|(team_id, (count, sum))| {
                state.teams.get(&team_id).map(|team| TeamAgeStatistics {
                    team_id,
                    team_name: team.name().to_string(),
                    member_count: count,
                    average_age: sum as f64 / count as f64,
                })
            })
            .collect();

        statistics.sort_by(|a, b| {
            a.team_name
                .cmp(&b.team_name)
                .then_with(|| a.team_id.cmp(&b.team_id))
        });

        Ok(statistics)
    }

    async fn bulk_rename(
        &self,
        conjunction: &Conjunction,
        username: &str,
    ) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;

        let mut state = self.store.write()?;
        let ids: Vec<_> = Self::matching(&state, conjunction)
            .into_iter()
            .map(|row| row.member_id)
            .collect();

        for id in &ids {
            if let Some(member) = state.members.get_mut(id) {
                member
                    .set_username(Some(username.to_string()))
                    .map_err(|e| DomainError::validation(e.to_string()))?;
            }
        }

        Ok(ids.len() as u64)
    }

    async fn bulk_add_age(&self, conjunction: &Conjunction, delta: i32) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;

        let mut state = self.store.write()?;
        let rows = Self::matching(&state, conjunction);

        // Validate every new age before touching any member.
        let mut updates = Vec::with_capacity(rows.len());
        for row in &rows {
            let age = row
                .age
                .checked_add(delta)
                .filter(|age| *age >= 0)
                .ok_or_else(|| {
                    DomainError::validation(format!(
                        "Adding {} to age {} of member '{}' is out of range",
                        delta, row.age, row.member_id
                    ))
                })?;
            updates.push((row.member_id, age));
        }

        for (id, age) in &updates {
            if let Some(member) = state.members.get_mut(id) {
                member
                    .set_age(*age)
                    .map_err(|e| DomainError::validation(e.to_string()))?;
            }
        }

        Ok(updates.len() as u64)
    }

    async fn bulk_delete(&self, conjunction: &Conjunction) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;

        let mut state = self.store.write()?;
        let ids: Vec<_> = Self::matching(&state, conjunction)
            .into_iter()
            .map(|row| row.member_id)
            .collect();

        for id in &ids {
            state.members.remove(id);
        }

        Ok(ids.len() as u64)
    }
}
