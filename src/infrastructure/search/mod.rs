//! Member search infrastructure: query repositories and the search service

mod in_memory;
mod postgres_repository;
mod service;
mod sql;

pub use in_memory::InMemoryMemberQueryRepository;
pub use postgres_repository::PostgresMemberQueryRepository;
pub use service::{MemberSearchService, MemberSearchServiceTrait, PaginationStrategy};
