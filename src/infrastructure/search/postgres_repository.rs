//! PostgreSQL member query repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use super::sql::{MemberSql, TEAM_STATISTICS};
use crate::domain::member::MemberId;
use crate::domain::search::{
    AgeStatistics, Conjunction, MemberQueryRepository, MemberTeamDto, Sort, TeamAgeStatistics,
};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Member queries rendered with [`MemberSql`] and run on a pool
#[derive(Debug, Clone)]
pub struct PostgresMemberQueryRepository {
    pool: PgPool,
}

impl PostgresMemberQueryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, sql: MemberSql) -> Result<Vec<PgRow>, DomainError> {
        let mut builder = sql.into_builder();
        debug!(sql = builder.sql(), "Running member query");

        builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query members: {}", e)))
    }

    async fn fetch_total(&self, sql: MemberSql) -> Result<u64, DomainError> {
        let mut builder = sql.into_builder();
        debug!(sql = builder.sql(), "Running member count");

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count members: {}", e)))?;

        let total: i64 = row.get("total_count");
        Ok(total as u64)
    }

    async fn execute(&self, sql: MemberSql, action: &str) -> Result<u64, DomainError> {
        let mut builder = sql.into_builder();
        debug!(sql = builder.sql(), "Running bulk statement");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to {} members: {}", action, e)))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MemberQueryRepository for PostgresMemberQueryRepository {
    async fn search(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        let sql = MemberSql::select().filter(conjunction).order_by(sort);
        let rows = self.fetch_rows(sql).await?;

        rows.iter().map(row_to_dto).collect()
    }

    async fn fetch_slice(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<MemberTeamDto>, DomainError> {
        let sql = MemberSql::select()
            .filter(conjunction)
            .order_by(sort)
            .limit_offset(limit, offset);
        let rows = self.fetch_rows(sql).await?;

        rows.iter().map(row_to_dto).collect()
    }

    async fn fetch_slice_with_total(
        &self,
        conjunction: &Conjunction,
        sort: &Sort,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<MemberTeamDto>, u64), DomainError> {
        let sql = MemberSql::select_with_total()
            .filter(conjunction)
            .order_by(sort)
            .limit_offset(limit, offset);
        let rows = self.fetch_rows(sql).await?;

        // The window total is only visible on returned rows.
        let total = match rows.first() {
            Some(row) => row.get::<i64, _>("total_count") as u64,
            None if offset == 0 => 0,
            None => self.count(conjunction).await?,
        };

        let content = rows.iter().map(row_to_dto).collect::<Result<Vec<_>, _>>()?;
        Ok((content, total))
    }

    async fn count(&self, conjunction: &Conjunction) -> Result<u64, DomainError> {
        self.fetch_total(MemberSql::count(conjunction).filter(conjunction))
            .await
    }

    async fn age_statistics(
        &self,
        conjunction: &Conjunction,
    ) -> Result<AgeStatistics, DomainError> {
        let mut builder = MemberSql::age_statistics(conjunction)
            .filter(conjunction)
            .into_builder();

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to aggregate members: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(AgeStatistics {
            count: count as u64,
            sum: row.get("sum"),
            average: row.get("average"),
            min: row.get("min"),
            max: row.get("max"),
        })
    }

    async fn team_statistics(&self) -> Result<Vec<TeamAgeStatistics>, DomainError> {
        let rows = sqlx::query(TEAM_STATISTICS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to aggregate teams: {}", e)))?;

        rows.iter()
            .map(|row| {
                let team_id: i64 = row.get("team_id");
                let member_count: i64 = row.get("member_count");

                Ok(TeamAgeStatistics {
                    team_id: TeamId::new(team_id)
                        .map_err(|e| DomainError::storage(e.to_string()))?,
                    team_name: row.get("team_name"),
                    member_count: member_count as u64,
                    average_age: row.get("average_age"),
                })
            })
            .collect()
    }

    async fn bulk_rename(
        &self,
        conjunction: &Conjunction,
        username: &str,
    ) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;
        self.execute(MemberSql::rename(username).filter(conjunction), "rename")
            .await
    }

    async fn bulk_add_age(&self, conjunction: &Conjunction, delta: i32) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let mut check = MemberSql::age_out_of_range(delta)
            .filter(conjunction)
            .into_builder();
        let out_of_range: i64 = check
            .build()
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check member ages: {}", e)))?
            .get("total_count");

        if out_of_range > 0 {
            return Err(DomainError::validation(format!(
                "Adding {} would move {} member age(s) out of range",
                delta, out_of_range
            )));
        }

        let mut update = MemberSql::add_age(delta).filter(conjunction).into_builder();
        let result = update
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update member ages: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit age update: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn bulk_delete(&self, conjunction: &Conjunction) -> Result<u64, DomainError> {
        conjunction.ensure_member_only()?;
        self.execute(MemberSql::delete().filter(conjunction), "delete")
            .await
    }
}

fn row_to_dto(row: &PgRow) -> Result<MemberTeamDto, DomainError> {
    let member_id: i64 = row.get("member_id");
    let team_id: Option<i64> = row.get("team_id");

    let member_id = MemberId::new(member_id).map_err(|e| DomainError::storage(e.to_string()))?;
    let team_id = team_id
        .map(TeamId::new)
        .transpose()
        .map_err(|e| DomainError::storage(e.to_string()))?;

    Ok(MemberTeamDto::new(
        member_id,
        row.get("username"),
        row.get("age"),
        team_id,
        row.get("team_name"),
    ))
}
