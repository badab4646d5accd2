//! Member search condition

use serde::Deserialize;

use super::predicate::{age_goe, age_loe, team_name_eq, username_eq, Conjunction};

/// Optional filters for member searches. Every field is independent; an
/// absent field places no restriction on its attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn with_age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn with_age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// Compile the condition into the conjunction of its present predicates
    pub fn to_conjunction(&self) -> Conjunction {
        [
            username_eq(self.username.as_deref()),
            team_name_eq(self.team_name.as_deref()),
            age_goe(self.age_goe),
            age_loe(self.age_loe),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::predicate::Predicate;

    #[test]
    fn test_empty_condition_has_no_predicates() {
        assert!(MemberSearchCondition::new().to_conjunction().is_empty());
    }

    #[test]
    fn test_full_condition() {
        let condition = MemberSearchCondition::new()
            .with_username("member1")
            .with_team_name("teamA")
            .with_age_goe(10)
            .with_age_loe(40);

        assert_eq!(
            condition.to_conjunction().predicates(),
            &[
                Predicate::UsernameEq("member1".to_string()),
                Predicate::TeamNameEq("teamA".to_string()),
                Predicate::AgeGoe(10),
                Predicate::AgeLoe(40),
            ]
        );
    }

    #[test]
    fn test_blank_team_name_is_ignored() {
        let condition = MemberSearchCondition::new()
            .with_team_name("  ")
            .with_age_goe(35);

        let conjunction = condition.to_conjunction();
        assert_eq!(conjunction.predicates(), &[Predicate::AgeGoe(35)]);
        assert!(!conjunction.requires_team());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let condition: MemberSearchCondition =
            serde_json::from_str(r#"{"teamName":"teamB","ageGoe":20}"#).unwrap();

        assert_eq!(condition.team_name.as_deref(), Some("teamB"));
        assert_eq!(condition.age_goe, Some(20));
        assert!(condition.username.is_none());
        assert!(condition.age_loe.is_none());
    }
}
