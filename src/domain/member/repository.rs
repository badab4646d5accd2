//! Member repository trait

use async_trait::async_trait;

use super::entity::{Member, MemberDraft, MemberId};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository trait for member storage
#[async_trait]
pub trait MemberRepository: Send + Sync + std::fmt::Debug {
    /// Persist a new member. Fails with not-found when the team is unknown.
    async fn create(&self, draft: MemberDraft) -> Result<Member, DomainError>;

    /// Get a member by ID
    async fn get(&self, id: MemberId) -> Result<Option<Member>, DomainError>;

    /// List all members ordered by ID
    async fn list(&self) -> Result<Vec<Member>, DomainError>;

    /// List members with the exact username
    async fn list_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError>;

    /// List the members of a team
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Member>, DomainError>;

    /// Update an existing member
    async fn update(&self, member: &Member) -> Result<Member, DomainError>;

    /// Delete a member
    async fn delete(&self, id: MemberId) -> Result<bool, DomainError>;

    /// Count all members
    async fn count(&self) -> Result<u64, DomainError>;
}
