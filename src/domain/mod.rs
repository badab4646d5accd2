//! Domain layer - Core entities, query model and repository traits

pub mod error;
pub mod member;
pub mod search;
pub mod team;

pub use error::DomainError;
pub use member::{Member, MemberDraft, MemberId, MemberRepository};
pub use search::{
    AgeStatistics, Conjunction, MemberQueryRepository, MemberSearchCondition, MemberTeamDto,
    Page, PageRequest, Predicate, Sort, SortKey, SortOrder, TeamAgeStatistics,
};
pub use team::{Team, TeamId, TeamRepository};
