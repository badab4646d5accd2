//! Member entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_age, validate_member_id, validate_username, MemberValidationError,
};
use crate::domain::team::TeamId;

/// Member identifier - database generated, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MemberId(i64);

impl MemberId {
    /// Create a new MemberId after validation
    pub fn new(id: i64) -> Result<Self, MemberValidationError> {
        validate_member_id(id)?;
        Ok(Self(id))
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for MemberId {
    type Error = MemberValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MemberId> for i64 {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    username: Option<String>,
    age: i32,
    team_id: Option<TeamId>,
}

impl MemberDraft {
    pub fn new(username: Option<String>, age: i32) -> Result<Self, MemberValidationError> {
        validate_username(username.as_deref())?;
        validate_age(age)?;

        Ok(Self {
            username,
            age,
            team_id: None,
        })
    }

    /// Shorthand for a named member without a team
    pub fn named(username: impl Into<String>, age: i32) -> Result<Self, MemberValidationError> {
        Self::new(Some(username.into()), age)
    }

    /// Assign the member to a team (builder pattern)
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    /// Attach the generated identity
    pub fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            username: self.username,
            age: self.age,
            team_id: self.team_id,
        }
    }
}

/// Member entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    id: MemberId,
    /// Username, absent for anonymous members
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    /// Age in years
    age: i32,
    /// Team this member belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<TeamId>,
}

impl Member {
    /// Rebuild a persisted member
    pub fn restore(
        id: MemberId,
        username: Option<String>,
        age: i32,
        team_id: Option<TeamId>,
    ) -> Result<Self, MemberValidationError> {
        validate_username(username.as_deref())?;
        validate_age(age)?;

        Ok(Self {
            id,
            username,
            age,
            team_id,
        })
    }

    // Getters

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    // Mutators

    pub fn set_username(&mut self, username: Option<String>) -> Result<(), MemberValidationError> {
        validate_username(username.as_deref())?;
        self.username = username;
        Ok(())
    }

    pub fn set_age(&mut self, age: i32) -> Result<(), MemberValidationError> {
        validate_age(age)?;
        self.age = age;
        Ok(())
    }

    /// Move the member to another team, or out of any team
    pub fn change_team(&mut self, team_id: Option<TeamId>) {
        self.team_id = team_id;
    }
}
