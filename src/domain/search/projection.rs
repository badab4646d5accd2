//! Flattened read models produced by member queries

use serde::Serialize;

use crate::domain::member::MemberId;
use crate::domain::team::TeamId;

/// Member joined with its (optional) team
///
/// Team columns are `None` when the member has no team, following left
/// outer join semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: MemberId,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

impl MemberTeamDto {
    pub fn new(
        member_id: MemberId,
        username: Option<String>,
        age: i32,
        team_id: Option<TeamId>,
        team_name: Option<String>,
    ) -> Self {
        Self {
            member_id,
            username,
            age,
            team_id,
            team_name,
        }
    }
}

/// Aggregate over the ages of matching members
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeStatistics {
    pub count: u64,
    pub sum: i64,
    pub average: Option<f64>,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl AgeStatistics {
    /// Statistics over no rows
    pub fn empty() -> Self {
        Self {
            count: 0,
            sum: 0,
            average: None,
            min: None,
            max: None,
        }
    }

    /// Fold a sequence of ages
    pub fn from_ages(ages: impl IntoIterator<Item = i32>) -> Self {
        let mut stats = Self::empty();

        for age in ages {
            stats.count += 1;
            stats.sum += i64::from(age);
            stats.min = Some(stats.min.map_or(age, |m| m.min(age)));
            stats.max = Some(stats.max.map_or(age, |m| m.max(age)));
        }

        if stats.count > 0 {
            stats.average = Some(stats.sum as f64 / stats.count as f64);
        }

        stats
    }
}

/// Per-team member count and average age
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAgeStatistics {
    pub team_id: TeamId,
    pub team_name: String,
    pub member_count: u64,
    pub average_age: f64,
}
