//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::{PaginationConfig, StorageConfig};
use crate::domain::member::MemberRepository;
use crate::domain::team::TeamRepository;
use crate::domain::DomainError;
use crate::infrastructure::member::{InMemoryMemberRepository, PostgresMemberRepository};
use crate::infrastructure::search::{
    InMemoryMemberQueryRepository, MemberSearchService, MemberSearchServiceTrait,
    PostgresMemberQueryRepository,
};
use crate::infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository};

use super::in_memory::InMemoryStore;
use super::migrations::run_storage_migrations;
use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Repositories and the search service over one storage backend
#[derive(Clone)]
pub struct Repositories {
    pub teams: Arc<dyn TeamRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub search: Arc<dyn MemberSearchServiceTrait>,
}

/// Factory wiring repositories for the configured backend
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Connect to the configured backend, migrating PostgreSQL when enabled
    pub async fn create(
        storage: &StorageConfig,
        pagination: &PaginationConfig,
    ) -> Result<Repositories, DomainError> {
        let storage_type: StorageType = storage.backend.parse()?;
        info!(backend = ?storage_type, "Creating repositories");

        match storage_type {
            StorageType::InMemory => Ok(Self::in_memory(pagination)),
            StorageType::Postgres => {
                let pool = PostgresConfig::from_storage_config(storage)?.connect().await?;
                info!("PostgreSQL connection established");

                if storage.run_migrations {
                    run_storage_migrations(&pool).await?;
                }

                Ok(Self::postgres(pool, pagination))
            }
        }
    }

    /// Repositories sharing one fresh in-memory store
    pub fn in_memory(pagination: &PaginationConfig) -> Repositories {
        let store = Arc::new(InMemoryStore::new());
        let query_repository = Arc::new(InMemoryMemberQueryRepository::new(store.clone()));

        Repositories {
            teams: Arc::new(InMemoryTeamRepository::new(store.clone())),
            members: Arc::new(InMemoryMemberRepository::new(store)),
            search: Arc::new(MemberSearchService::with_config(
                query_repository,
                pagination.clone(),
            )),
        }
    }

    /// Repositories over an existing pool
    pub fn postgres(pool: PgPool, pagination: &PaginationConfig) -> Repositories {
        let query_repository = Arc::new(PostgresMemberQueryRepository::new(pool.clone()));

        Repositories {
            teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
            members: Arc::new(PostgresMemberRepository::new(pool)),
            search: Arc::new(MemberSearchService::with_config(
                query_repository,
                pagination.clone(),
            )),
        }
    }
}
