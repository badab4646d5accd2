//! Result ordering for member queries
//!
//! Every ordering ends with `member_id ASC` so that rows never tie and
//! consecutive pages slice one well-defined sequence.

use std::cmp::Ordering;
use std::str::FromStr;

use super::projection::MemberTeamDto;
use crate::domain::DomainError;

/// Sortable attributes of the member/team projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    MemberId,
    Username,
    Age,
    TeamName,
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" | "memberId" | "member_id" => Ok(Self::MemberId),
            "username" => Ok(Self::Username),
            "age" => Ok(Self::Age),
            "teamName" | "team_name" => Ok(Self::TeamName),
            other => Err(DomainError::validation(format!(
                "Unknown sort property '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Placement of NULL values. `Native` follows PostgreSQL: last when
/// ascending, first when descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHandling {
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: Direction,
    pub nulls: NullHandling,
}

impl SortOrder {
    pub fn asc(key: SortKey) -> Self {
        Self {
            key,
            direction: Direction::Asc,
            nulls: NullHandling::Native,
        }
    }

    pub fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: Direction::Desc,
            nulls: NullHandling::Native,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullHandling::NullsFirst;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullHandling::NullsLast;
        self
    }

    /// Whether NULLs come before non-NULL values for this order
    pub fn places_nulls_first(&self) -> bool {
        match self.nulls {
            NullHandling::Native => self.direction == Direction::Desc,
            NullHandling::NullsFirst => true,
            NullHandling::NullsLast => false,
        }
    }

    fn compare(&self, a: &MemberTeamDto, b: &MemberTeamDto) -> Ordering {
        match self.key {
            SortKey::MemberId => self.directed(a.member_id.cmp(&b.member_id)),
            SortKey::Age => self.directed(a.age.cmp(&b.age)),
            SortKey::Username => self.compare_nullable(a.username.as_deref(), b.username.as_deref()),
            SortKey::TeamName => {
                self.compare_nullable(a.team_name.as_deref(), b.team_name.as_deref())
            }
        }
    }

    fn compare_nullable(&self, a: Option<&str>, b: Option<&str>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) if self.places_nulls_first() => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) if self.places_nulls_first() => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => self.directed(a.cmp(b)),
        }
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    /// Parse `key[:asc|desc][:nulls_first|nulls_last]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':').map(str::trim);
        let key: SortKey = parts.next().unwrap_or_default().parse()?;
        let mut order = SortOrder::asc(key);

        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "asc" => order.direction = Direction::Asc,
                "desc" => order.direction = Direction::Desc,
                "nulls_first" | "nullsfirst" => order.nulls = NullHandling::NullsFirst,
                "nulls_last" | "nullslast" => order.nulls = NullHandling::NullsLast,
                other => {
                    return Err(DomainError::validation(format!(
                        "Unknown sort modifier '{}' in '{}'",
                        other, s
                    )))
                }
            }
        }

        Ok(order)
    }
}

/// Ordered list of sort orders; empty means "by member ID"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(order: SortOrder) -> Self {
        Self {
            orders: vec![order],
        }
    }

    pub fn and(mut self, order: SortOrder) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Parse a comma separated list such as `age:desc,username:asc:nulls_last`
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let orders = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(SortOrder::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { orders })
    }

    /// Total order over projected rows, ending with the member ID
    pub fn compare(&self, a: &MemberTeamDto, b: &MemberTeamDto) -> Ordering {
        self.orders
            .iter()
            .map(|order| order.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.member_id.cmp(&b.member_id))
    }
}
