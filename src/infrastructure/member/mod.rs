//! Member repository implementations

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryMemberRepository;
pub use postgres_repository::PostgresMemberRepository;
