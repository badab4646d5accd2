//! Member search: predicates, ordering, pagination and the query repository

mod condition;
mod count;
mod page;
mod predicate;
mod projection;
mod repository;
mod sort;

pub use condition::MemberSearchCondition;
pub use count::{resolve_total, TotalCount, TotalHint};
pub use page::{Page, PageRequest};
pub use predicate::{
    age_eq, age_goe, age_gt, age_loe, age_lt, team_name_eq, username_contains, username_eq,
    Conjunction, Predicate,
};
pub use projection::{AgeStatistics, MemberTeamDto, TeamAgeStatistics};
pub use repository::MemberQueryRepository;
pub use sort::{Direction, NullHandling, Sort, SortKey, SortOrder};

#[cfg(test)]
pub use repository::MockMemberQueryRepository;
