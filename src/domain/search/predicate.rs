//! Optional predicate fragments and their conjunction
//!
//! Every builder function maps an optional filter value to
//! `Option<Predicate>`: `None` means "no condition on this attribute" and is
//! the identity element of [`Conjunction`], never "always false".

use super::projection::MemberTeamDto;
use crate::domain::DomainError;

/// A single boolean condition over one attribute of the member/team join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    UsernameEq(String),
    UsernameContains(String),
    TeamNameEq(String),
    AgeEq(i32),
    AgeGoe(i32),
    AgeLoe(i32),
    AgeGt(i32),
    AgeLt(i32),
}

impl Predicate {
    /// Whether evaluating this predicate needs the team side of the join
    pub fn requires_team(&self) -> bool {
        matches!(self, Self::TeamNameEq(_))
    }

    /// Evaluate against a projected row with SQL semantics: a comparison
    /// against a NULL column never matches.
    pub fn matches(&self, row: &MemberTeamDto) -> bool {
        match self {
            Self::UsernameEq(value) => row.username.as_deref() == Some(value.as_str()),
            Self::UsernameContains(value) => row
                .username
                .as_deref()
                .is_some_and(|username| username.contains(value.as_str())),
            Self::TeamNameEq(value) => row.team_name.as_deref() == Some(value.as_str()),
            Self::AgeEq(value) => row.age == *value,
            Self::AgeGoe(value) => row.age >= *value,
            Self::AgeLoe(value) => row.age <= *value,
            Self::AgeGt(value) => row.age > *value,
            Self::AgeLt(value) => row.age < *value,
        }
    }
}

fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `member.username = ?` when the username has text
pub fn username_eq(username: Option<&str>) -> Option<Predicate> {
    has_text(username).map(|v| Predicate::UsernameEq(v.to_string()))
}

/// `member.username LIKE %?%` when the fragment has text
pub fn username_contains(fragment: Option<&str>) -> Option<Predicate> {
    has_text(fragment).map(|v| Predicate::UsernameContains(v.to_string()))
}

/// `team.name = ?` when the team name has text
pub fn team_name_eq(team_name: Option<&str>) -> Option<Predicate> {
    has_text(team_name).map(|v| Predicate::TeamNameEq(v.to_string()))
}

/// `member.age = ?`
pub fn age_eq(age: Option<i32>) -> Option<Predicate> {
    age.map(Predicate::AgeEq)
}

/// `member.age >= ?`
pub fn age_goe(age: Option<i32>) -> Option<Predicate> {
    age.map(Predicate::AgeGoe)
}

/// `member.age <= ?`
pub fn age_loe(age: Option<i32>) -> Option<Predicate> {
    age.map(Predicate::AgeLoe)
}

/// `member.age > ?`
pub fn age_gt(age: Option<i32>) -> Option<Predicate> {
    age.map(Predicate::AgeGt)
}

/// `member.age < ?`
pub fn age_lt(age: Option<i32>) -> Option<Predicate> {
    age.map(Predicate::AgeLt)
}

/// Conjunction of the present predicates. Empty means "always true".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conjunction {
    predicates: Vec<Predicate>,
}

impl Conjunction {
    /// The empty conjunction, matching every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a predicate fragment; absent fragments are skipped
    pub fn and(mut self, predicate: Option<Predicate>) -> Self {
        self.predicates.extend(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether any predicate needs the team side of the join
    pub fn requires_team(&self) -> bool {
        self.predicates.iter().any(Predicate::requires_team)
    }

    pub fn matches(&self, row: &MemberTeamDto) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Bulk statements run against the member table alone
    pub fn ensure_member_only(&self) -> Result<(), DomainError> {
        if self.requires_team() {
            return Err(DomainError::validation(
                "Bulk operations cannot filter on team columns",
            ));
        }

        Ok(())
    }
}

impl FromIterator<Option<Predicate>> for Conjunction {
    fn from_iter<I: IntoIterator<Item = Option<Predicate>>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().flatten().collect(),
        }
    }
}

impl From<Predicate> for Conjunction {
    fn from(predicate: Predicate) -> Self {
        Self {
            predicates: vec![predicate],
        }
    }
}
