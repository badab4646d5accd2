//! Dynamic SQL for member queries
//!
//! Statements alias `members` as `m` and `teams` as `t`. Filter values are
//! always bound as parameters. JOINs must be pushed before the first
//! condition because `QueryBuilder` only appends.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::search::{Conjunction, Direction, NullHandling, Predicate, Sort, SortKey};

const PROJECTION: &str = "SELECT m.id AS member_id, m.username, m.age, \
                          t.id AS team_id, t.name AS team_name";
const TEAM_JOIN: &str = " LEFT JOIN teams t ON t.id = m.team_id";

/// Incrementally built statement over `members m`
pub struct MemberSql {
    query: QueryBuilder<'static, Postgres>,
    has_conditions: bool,
}

impl MemberSql {
    fn new(head: &str) -> Self {
        Self {
            query: QueryBuilder::new(head),
            has_conditions: false,
        }
    }

    /// Left-joined projection of members and teams
    pub fn select() -> Self {
        Self::new(&format!("{} FROM members m{}", PROJECTION, TEAM_JOIN))
    }

    /// Projection plus the size of the whole filtered set on every row
    pub fn select_with_total() -> Self {
        Self::new(&format!(
            "{}, COUNT(*) OVER () AS total_count FROM members m{}",
            PROJECTION, TEAM_JOIN
        ))
    }

    /// Row count; the team join is added only when a predicate needs it.
    /// A member has at most one team, so the left join never changes the
    /// count.
    pub fn count(conjunction: &Conjunction) -> Self {
        let mut sql = Self::new("SELECT COUNT(*) AS total_count FROM members m");
        if conjunction.requires_team() {
            sql.query.push(TEAM_JOIN);
        }
        sql
    }

    /// Aggregates over matching member ages
    pub fn age_statistics(conjunction: &Conjunction) -> Self {
        let mut sql = Self::new(
            "SELECT COUNT(m.id) AS count, COALESCE(SUM(m.age), 0)::BIGINT AS sum, \
             AVG(m.age)::DOUBLE PRECISION AS average, MIN(m.age) AS min, MAX(m.age) AS max \
             FROM members m",
        );
        if conjunction.requires_team() {
            sql.query.push(TEAM_JOIN);
        }
        sql
    }

    /// `UPDATE members m SET username = ?`
    pub fn rename(username: &str) -> Self {
        let mut sql = Self::new("UPDATE members m SET username = ");
        sql.query.push_bind(username.to_string());
        sql
    }

    /// `UPDATE members m SET age = m.age + ?`
    pub fn add_age(delta: i32) -> Self {
        let mut sql = Self::new("UPDATE members m SET age = m.age + ");
        sql.query.push_bind(delta);
        sql
    }

    pub fn delete() -> Self {
        Self::new("DELETE FROM members m")
    }

    /// Matching rows whose age would leave the `0..=i32::MAX` range after
    /// adding `delta`
    pub fn age_out_of_range(delta: i32) -> Self {
        let mut sql = Self::new("SELECT COUNT(*) AS total_count FROM members m");
        sql.add_condition("(m.age::BIGINT + ");
        sql.query.push_bind(i64::from(delta));
        sql.query.push(") NOT BETWEEN 0 AND ");
        sql.query.push_bind(i64::from(i32::MAX));
        sql
    }

    fn add_condition(&mut self, condition: &str) {
        if self.has_conditions {
            self.query.push(" AND ");
        } else {
            self.query.push(" WHERE ");
            self.has_conditions = true;
        }
        self.query.push(condition);
    }

    /// AND every predicate of the conjunction into the WHERE clause
    pub fn filter(mut self, conjunction: &Conjunction) -> Self {
        for predicate in conjunction.predicates() {
            self.push_predicate(predicate);
        }
        self
    }

    fn push_predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::UsernameEq(value) => {
                self.add_condition("m.username = ");
                self.query.push_bind(value.clone());
            }
            Predicate::UsernameContains(value) => {
                self.add_condition("m.username LIKE ");
                self.query.push_bind(format!("%{}%", escape_like(value)));
                self.query.push(" ESCAPE '\\'");
            }
            Predicate::TeamNameEq(value) => {
                self.add_condition("t.name = ");
                self.query.push_bind(value.clone());
            }
            Predicate::AgeEq(value) => {
                self.add_condition("m.age = ");
                self.query.push_bind(*value);
            }
            Predicate::AgeGoe(value) => {
                self.add_condition("m.age >= ");
                self.query.push_bind(*value);
            }
            Predicate::AgeLoe(value) => {
                self.add_condition("m.age <= ");
                self.query.push_bind(*value);
            }
            Predicate::AgeGt(value) => {
                self.add_condition("m.age > ");
                self.query.push_bind(*value);
            }
            Predicate::AgeLt(value) => {
                self.add_condition("m.age < ");
                self.query.push_bind(*value);
            }
        }
    }

    /// ORDER BY the requested orders, then `m.id ASC`
    pub fn order_by(mut self, sort: &Sort) -> Self {
        self.query.push(" ORDER BY ");

        for order in sort.orders() {
            self.query.push(sort_column(order.key));
            self.query.push(match order.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
            match order.nulls {
                NullHandling::Native => {}
                NullHandling::NullsFirst => {
                    self.query.push(" NULLS FIRST");
                }
                NullHandling::NullsLast => {
                    self.query.push(" NULLS LAST");
                }
            }
            self.query.push(", ");
        }

        self.query.push("m.id ASC");
        self
    }

    pub fn limit_offset(mut self, limit: u64, offset: u64) -> Self {
        self.query.push(" LIMIT ");
        self.query.push_bind(saturating_i64(limit));
        self.query.push(" OFFSET ");
        self.query.push_bind(saturating_i64(offset));
        self
    }

    pub fn into_builder(self) -> QueryBuilder<'static, Postgres> {
        self.query
    }

    #[cfg(test)]
    pub fn sql(&self) -> &str {
        self.query.sql()
    }
}

fn sort_column(key: SortKey) -> &'static str {
    match key {
        SortKey::MemberId => "m.id",
        SortKey::Username => "m.username",
        SortKey::Age => "m.age",
        SortKey::TeamName => "t.name",
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Escape LIKE wildcards so the fragment matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Per-team member count and average age, ordered by team name
pub const TEAM_STATISTICS: &str = "SELECT t.id AS team_id, t.name AS team_name, \
     COUNT(m.id) AS member_count, AVG(m.age)::DOUBLE PRECISION AS average_age \
     FROM teams t JOIN members m ON m.team_id = t.id \
     GROUP BY t.id, t.name ORDER BY t.name, t.id";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::{age_goe, age_loe, team_name_eq, username_eq, SortOrder};

    #[test]
    fn test_select_without_conditions() {
        let sql = MemberSql::select()
            .filter(&Conjunction::all())
            .order_by(&Sort::unsorted());

        assert_eq!(
            sql.sql(),
            "SELECT m.id AS member_id, m.username, m.age, t.id AS team_id, t.name AS team_name \
             FROM members m LEFT JOIN teams t ON t.id = m.team_id ORDER BY m.id ASC"
        );
    }

    #[test]
    fn test_filter_binds_every_value() {
        let conjunction: Conjunction = [
            username_eq(Some("member1")),
            team_name_eq(Some("teamA")),
            age_goe(Some(10)),
            age_loe(Some(40)),
        ]
        .into_iter()
        .collect();

        let sql = MemberSql::select().filter(&conjunction);

        assert!(sql.sql().ends_with(
            " WHERE m.username = $1 AND t.name = $2 AND m.age >= $3 AND m.age <= $4"
        ));
        assert!(!sql.sql().contains("member1"));
    }

    #[test]
    fn test_order_by_with_nulls_and_tiebreaker() {
        let sort = Sort::by(SortOrder::desc(SortKey::Age))
            .and(SortOrder::asc(SortKey::Username).nulls_last());
        let sql = MemberSql::select().order_by(&sort).limit_offset(5, 10);

        assert!(sql.sql().ends_with(
            " ORDER BY m.age DESC, m.username ASC NULLS LAST, m.id ASC LIMIT $1 OFFSET $2"
        ));
    }

    #[test]
    fn test_count_joins_team_only_when_needed() {
        let by_age = Conjunction::all().and(age_goe(Some(20)));
        let sql = MemberSql::count(&by_age).filter(&by_age);
        assert_eq!(
            sql.sql(),
            "SELECT COUNT(*) AS total_count FROM members m WHERE m.age >= $1"
        );

        let by_team = Conjunction::all().and(team_name_eq(Some("teamB")));
        let sql = MemberSql::count(&by_team).filter(&by_team);
        assert!(sql.sql().contains("LEFT JOIN teams t ON t.id = m.team_id WHERE t.name = $1"));
    }

    #[test]
    fn test_select_with_total_uses_window() {
        let sql = MemberSql::select_with_total();
        assert!(sql.sql().contains("COUNT(*) OVER () AS total_count"));
    }

    #[test]
    fn test_bulk_statements() {
        let conjunction = Conjunction::from(Predicate::AgeLt(28));

        assert_eq!(
            MemberSql::rename("unknown").filter(&conjunction).sql(),
            "UPDATE members m SET username = $1 WHERE m.age < $2"
        );
        assert_eq!(
            MemberSql::add_age(1).filter(&Conjunction::all()).sql(),
            "UPDATE members m SET age = m.age + $1"
        );
        assert_eq!(
            MemberSql::delete()
                .filter(&Conjunction::from(Predicate::AgeGt(18)))
                .sql(),
            "DELETE FROM members m WHERE m.age > $1"
        );
    }

    #[test]
    fn test_age_range_check_keeps_conditions_conjunctive() {
        let sql = MemberSql::age_out_of_range(-5).filter(&Conjunction::from(Predicate::AgeLt(3)));

        assert!(sql.sql().ends_with(
            " WHERE (m.age::BIGINT + $1) NOT BETWEEN 0 AND $2 AND m.age < $3"
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("member"), "member");
    }
}
