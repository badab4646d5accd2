//! Storage infrastructure - backends, pooling and migrations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageFactory, StorageType};
pub use in_memory::{InMemoryStore, StoreState};
pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::PostgresConfig;
