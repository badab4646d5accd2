//! PostgreSQL member repository implementation

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use crate::domain::member::{Member, MemberDraft, MemberId, MemberRepository};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

const MEMBER_COLUMNS: &str = "id, username, age, team_id";

/// PostgreSQL implementation of MemberRepository
#[derive(Debug, Clone)]
pub struct PostgresMemberRepository {
    pool: PgPool,
}

impl PostgresMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_members(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<Vec<Member>, DomainError> {
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list members: {}", e)))?;

        rows.iter().map(row_to_member).collect()
    }
}

/// Translate a foreign key violation into a missing-team error
fn map_write_error(e: sqlx::Error, team_id: Option<TeamId>, action: &str) -> DomainError {
    let msg = e.to_string();

    match team_id {
        Some(id) if msg.contains("foreign key") => {
            DomainError::not_found(format!("Team '{}' not found", id))
        }
        _ => DomainError::storage(format!("Failed to {} member: {}", action, e)),
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn create(&self, draft: MemberDraft) -> Result<Member, DomainError> {
        let sql = format!(
            "INSERT INTO members (username, age, team_id) VALUES ($1, $2, $3) RETURNING {}",
            MEMBER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(draft.username())
            .bind(draft.age())
            .bind(draft.team_id().map(|id| id.value()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, draft.team_id(), "create"))?;

        row_to_member(&row)
    }

    async fn get(&self, id: MemberId) -> Result<Option<Member>, DomainError> {
        let sql = format!("SELECT {} FROM members WHERE id = $1", MEMBER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get member: {}", e)))?;

        row.as_ref().map(row_to_member).transpose()
    }

    async fn list(&self) -> Result<Vec<Member>, DomainError> {
        let sql = format!("SELECT {} FROM members ORDER BY id", MEMBER_COLUMNS);
        self.fetch_members(sqlx::query(&sql)).await
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<Member>, DomainError> {
        let sql = format!(
            "SELECT {} FROM members WHERE username = $1 ORDER BY id",
            MEMBER_COLUMNS
        );
        self.fetch_members(sqlx::query(&sql).bind(username)).await
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Member>, DomainError> {
        let sql = format!(
            "SELECT {} FROM members WHERE team_id = $1 ORDER BY id",
            MEMBER_COLUMNS
        );
        self.fetch_members(sqlx::query(&sql).bind(team_id.value()))
            .await
    }

    async fn update(&self, member: &Member) -> Result<Member, DomainError> {
        let result = sqlx::query(
            "UPDATE members SET username = $2, age = $3, team_id = $4 WHERE id = $1",
        )
        .bind(member.id().value())
        .bind(member.username())
        .bind(member.age())
        .bind(member.team_id().map(|id| id.value()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, member.team_id(), "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Member '{}' not found",
                member.id()
            )));
        }

        Ok(member.clone())
    }

    async fn delete(&self, id: MemberId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count members: {}", e)))?;

        Ok(count as u64)
    }
}

fn row_to_member(row: &PgRow) -> Result<Member, DomainError> {
    let id: i64 = row.get("id");
    let username: Option<String> = row.get("username");
    let age: i32 = row.get("age");
    let team_id: Option<i64> = row.get("team_id");

    let id = MemberId::new(id).map_err(|e| DomainError::storage(e.to_string()))?;
    let team_id = team_id
        .map(TeamId::new)
        .transpose()
        .map_err(|e| DomainError::storage(e.to_string()))?;

    Member::restore(id, username, age, team_id).map_err(|e| DomainError::storage(e.to_string()))
}
