//! Team entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{validate_team_id, validate_team_name, TeamValidationError};

/// Team identifier - database generated, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TeamId(i64);

impl TeamId {
    /// Create a new TeamId after validation
    pub fn new(id: i64) -> Result<Self, TeamValidationError> {
        validate_team_id(id)?;
        Ok(Self(id))
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TeamId {
    type Error = TeamValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamId> for i64 {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity
///
/// A team groups members. The members themselves are reached through
/// `MemberRepository::list_by_team`; the team never owns their lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    id: TeamId,
    /// Display name
    name: String,
}

impl Team {
    /// Create a team from an already persisted identity
    pub fn new(id: TeamId, name: impl Into<String>) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;

        Ok(Self { id, name })
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_id_valid() {
        let id = TeamId::new(42).unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_team_id_invalid() {
        assert!(TeamId::new(0).is_err());
        assert!(TeamId::new(-1).is_err());
    }

    #[test]
    fn test_team_id_deserialize_rejects_non_positive() {
        assert!(serde_json::from_str::<TeamId>("5").is_ok());
        assert!(serde_json::from_str::<TeamId>("0").is_err());
    }

    #[test]
    fn test_team_creation() {
        let team = Team::new(TeamId::new(1).unwrap(), "teamA").unwrap();

        assert_eq!(team.id().value(), 1);
        assert_eq!(team.name(), "teamA");
    }

    #[test]
    fn test_team_invalid_name() {
        assert!(Team::new(TeamId::new(1).unwrap(), "").is_err());
    }

    #[test]
    fn test_team_update_name() {
        let mut team = Team::new(TeamId::new(1).unwrap(), "teamA").unwrap();

        team.set_name("teamC").unwrap();
        assert_eq!(team.name(), "teamC");

        assert!(team.set_name(" ").is_err());
        assert_eq!(team.name(), "teamC");
    }
}
