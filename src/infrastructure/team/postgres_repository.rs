//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::team::{validate_team_name, Team, TeamId, TeamRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, name: &str) -> Result<Team, DomainError> {
        validate_team_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let row = sqlx::query("INSERT INTO teams (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create team: {}", e)))?;

        row_to_team(&row)
    }

    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM teams WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM teams WHERE name = $1 ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team by name: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query("SELECT id, name FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let result = sqlx::query("UPDATE teams SET name = $2 WHERE id = $1")
            .bind(team.id().value())
            .bind(team.name())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update team: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("Team '{}' not found", team.id())));
        }

        Ok(team.clone())
    }

    async fn delete(&self, id: TeamId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                let msg = e.to_string();

                if msg.contains("foreign key") {
                    DomainError::conflict(format!("Team '{}' still has members", id))
                } else {
                    DomainError::storage(format!("Failed to delete team: {}", e))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        Ok(count as u64)
    }
}

fn row_to_team(row: &PgRow) -> Result<Team, DomainError> {
    let id: i64 = row.get("id");
    let name: String = row.get("name");

    let id = TeamId::new(id).map_err(|e| DomainError::storage(e.to_string()))?;
    Team::new(id, name).map_err(|e| DomainError::storage(e.to_string()))
}
