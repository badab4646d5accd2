//! Member validation

use thiserror::Error;

/// Errors that can occur during member validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MemberValidationError {
    #[error("Member ID must be a positive integer, got {0}")]
    InvalidId(i64),

    #[error("Username cannot be blank; omit it instead")]
    BlankUsername,

    #[error("Username cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error("Age cannot be negative, got {0}")]
    NegativeAge(i32),
}

const MAX_USERNAME_LENGTH: usize = 100;

/// Validate a member ID
pub fn validate_member_id(id: i64) -> Result<(), MemberValidationError> {
    if id <= 0 {
        return Err(MemberValidationError::InvalidId(id));
    }

    Ok(())
}

/// Validate an optional username. Absent usernames are allowed.
pub fn validate_username(username: Option<&str>) -> Result<(), MemberValidationError> {
    let Some(username) = username else {
        return Ok(());
    };

    if username.trim().is_empty() {
        return Err(MemberValidationError::BlankUsername);
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(MemberValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    Ok(())
}

/// Validate an age
pub fn validate_age(age: i32) -> Result<(), MemberValidationError> {
    if age < 0 {
        return Err(MemberValidationError::NegativeAge(age));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id() {
        assert!(validate_member_id(1).is_ok());
        assert_eq!(validate_member_id(0), Err(MemberValidationError::InvalidId(0)));
    }

    #[test]
    fn test_username() {
        assert!(validate_username(None).is_ok());
        assert!(validate_username(Some("member1")).is_ok());
        assert_eq!(
            validate_username(Some("  ")),
            Err(MemberValidationError::BlankUsername)
        );
        assert_eq!(
            validate_username(Some(&"x".repeat(101))),
            Err(MemberValidationError::UsernameTooLong(100))
        );
    }

    #[test]
    fn test_age() {
        assert!(validate_age(0).is_ok());
        assert!(validate_age(100).is_ok());
        assert_eq!(validate_age(-1), Err(MemberValidationError::NegativeAge(-1)));
    }
}
