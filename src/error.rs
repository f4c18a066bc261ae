use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::shape::{unique_field_for_constraint, Entity};

/// Rejections raised while checking an untrusted payload against an insert
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    MissingRequiredField(String),
    #[error("unexpected field `{0}`")]
    UnexpectedField(String),
    #[error("field `{field}` must be {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    /// The `New*` struct refused a payload that passed the column checks.
    /// Only reachable when an entity's `COLUMNS` and its insert struct
    /// disagree.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("uniqueness violation on `{constraint}`")]
    UniquenessViolation { constraint: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("a user cannot follow themselves")]
    SelfFollow,
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(DieselError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, StoreError::UniquenessViolation { .. })
    }

    /// The field of `E` whose single-column uniqueness was violated.
    pub fn conflicting_field<E: Entity>(&self) -> Option<&'static str> {
        match self {
            StoreError::UniquenessViolation { constraint } => {
                unique_field_for_constraint::<E>(constraint)
            }
            _ => None,
        }
    }
}

impl From<DieselError> for StoreError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniquenessViolation {
                    constraint: info
                        .constraint_name()
                        .unwrap_or("unknown")
                        .to_string(),
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                StoreError::InvalidReference(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info)
                if info.constraint_name() == Some("follows_no_self_follow") =>
            {
                StoreError::SelfFollow
            }
            other => StoreError::Database(other),
        }
    }
}
