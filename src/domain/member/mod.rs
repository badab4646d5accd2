//! Member domain
//!
//! Members carry an optional username, an age and a weak reference to at
//! most one team.

mod entity;
mod repository;
mod validation;

pub use entity::{Member, MemberDraft, MemberId};
pub use repository::MemberRepository;
pub use validation::{
    validate_age, validate_member_id, validate_username, MemberValidationError,
};
