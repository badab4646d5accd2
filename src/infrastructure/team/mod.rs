//! Team repository implementations

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryTeamRepository;
pub use postgres_repository::PostgresTeamRepository;
