//! Team domain module
//!
//! Teams group members. A member belongs to at most one team, and a team
//! cannot be removed while members still point at it.

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId};
pub use repository::TeamRepository;
pub use validation::{validate_team_id, validate_team_name, TeamValidationError};
