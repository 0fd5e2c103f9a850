use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::forms::customer::FieldErrors;
use crate::repository::errors::{Constraint, RepositoryError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    /// A customer write rejected by validation or by a storage constraint.
    #[error("customer rejected")]
    Fields(FieldErrors),

    #[error("constraint violation: {0}")]
    Constraint(Constraint),

    #[error("type constraint: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Constraint(constraint) => ServiceError::Constraint(constraint),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::Internal(format!("csv: {err}"))
    }
}
