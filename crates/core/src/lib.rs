//! Shared primitives for all Rust crates in Skillmatrix.

#![forbid(unsafe_code)]

/// Authenticated actor primitives shared across services.
pub mod auth;
mod ids;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{Actor, Role};
pub use ids::{AssessmentId, DepartmentId, JobProfileId, SkillId, UserId};

/// Result type used across Skillmatrix crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value.trim().to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No authenticated actor is present.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Actor is authenticated but blocked by a permission or scope check.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A state transition was requested that the current state does not allow.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A multi-record write could not be applied as one unit and was rolled back.
    #[error("inconsistent write: {0}")]
    InconsistentWrite(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
