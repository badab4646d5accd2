//! Member query repository trait

use async_trait::async_trait;

use super::predicate::Conjunction;
use super::projection::{AgeStatistics, MemberTeamDto, TeamAgeStatistics};
use super::sort::Sort;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Read and bulk-write access to members left-joined with their teams.
///
/// All operations take a [`Conjunction`]; an empty one matches every member.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MemberQueryRepository: Send + Sync {
    /// All matching rows in sort order
    async fn search(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
    ) -> Result<Vec<MemberTeamDto>, DomainError>;

    /// At most `limit` matching rows starting at `offset`
    async fn fetch_slice(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MemberTeamDto>, DomainError>;

    /// A slice together with the total number of matching rows, obtained in
    /// one round trip where the backend allows it
    async fn fetch_slice_with_total(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<MemberTeamDto>, u64), DomainError>;

    /// Number of matching rows
    async fn count(&self, conjunction: &Conjunction) -> Result<u64, DomainError>;

    /// Count, sum, average, min and max of matching ages
    async fn age_statistics(&self, conjunction: &Conjunction)
        -> Result<AgeStatistics, DomainError>;

    /// Member count and average age for every team with members, by team name
    async fn team_statistics(&self) -> Result<Vec<TeamAgeStatistics>, DomainError>;

    /// Set the username of every matching member, returning affected rows
    async fn bulk_rename(&self, conjunction: &Conjunction, username: &str)
        -> Result<u64, DomainError>;

    /// Add `delta` to the age of every matching member, returning affected rows
    async fn bulk_add_age(&self, conjunction: &Conjunction, delta: i32)
        -> Result<u64, DomainError>;

    /// Delete every matching member, returning affected rows
    async fn bulk_delete(&self, conjunction: &Conjunction) -> Result<u64, DomainError>;
}
