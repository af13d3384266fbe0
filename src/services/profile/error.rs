//! Typed errors for the profile store.
//!
//! Everything here is an expected, recoverable condition. Callers at the
//! boundary surface these as user-facing messages; only wrapped database
//! failures indicate something genuinely wrong.

use thiserror::Error;

use crate::models::profile::DraftValidationError;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{0}")]
    Validation(#[from] DraftValidationError),

    #[error("a profile named '{0}' already exists")]
    DuplicateName(String),

    #[error("profile {0} not found")]
    NotFound(i64),

    #[error("profile {id} is assigned to {count} course(s) and cannot be deleted")]
    InUse { id: i64, count: i64 },

    #[error("invalid color format: '{0}'")]
    InvalidColor(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

impl ProfileError {
    /// Whether this error is a business-rule rejection rather than a fault.
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ProfileError::DuplicateName("Ocean".to_string());
        assert_eq!(err.to_string(), "a profile named 'Ocean' already exists");

        let err = ProfileError::InUse { id: 3, count: 2 };
        assert!(err.to_string().contains("2 course(s)"));
    }

    #[test]
    fn test_expected_classification() {
        assert!(ProfileError::NotFound(1).is_expected());
        assert!(ProfileError::InvalidColor("red".into()).is_expected());
        assert!(!ProfileError::Database(rusqlite::Error::InvalidQuery).is_expected());
    }
}
