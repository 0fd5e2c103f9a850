use std::fmt::{Display, Formatter};

use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Named storage constraints reported back to callers as structured codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    CustomerEmailUnique,
    CustomerEmailFormat,
    CustomerNameLength,
    CustomerPhoneLength,
    CustomerAddressLength,
    CustomerAgeRange,
    CustomerInterestsLength,
    CustomerFeelingsLength,
    CustomerValuesLength,
    CustomerOtherInfoLength,
    ProfileEmailUnique,
    ProfileRoleKnown,
}

/// Markers SQLite may print for each constraint. Unique violations name the
/// column (`table.column`), check violations name the constraint itself.
const MARKERS: &[(Constraint, &[&str])] = &[
    (
        Constraint::CustomerEmailUnique,
        &["customers_email_unique", "customers.email"],
    ),
    (Constraint::CustomerEmailFormat, &["customers_email_format"]),
    (Constraint::CustomerNameLength, &["customers_name_length"]),
    (Constraint::CustomerPhoneLength, &["customers_phone_length"]),
    (Constraint::CustomerAddressLength, &["customers_address_length"]),
    (Constraint::CustomerAgeRange, &["customers_age_range"]),
    (
        Constraint::CustomerInterestsLength,
        &["customers_interests_length"],
    ),
    (
        Constraint::CustomerFeelingsLength,
        &["customers_feelings_length"],
    ),
    (Constraint::CustomerValuesLength, &["customers_values_length"]),
    (
        Constraint::CustomerOtherInfoLength,
        &["customers_other_info_length"],
    ),
    (
        Constraint::ProfileEmailUnique,
        &["profiles_email_unique", "profiles.email"],
    ),
    (Constraint::ProfileRoleKnown, &["profiles_role_known"]),
];

impl Constraint {
    /// Stable code of the constraint, matching its name in the schema.
    pub fn code(self) -> &'static str {
        match self {
            Constraint::CustomerEmailUnique => "customers_email_unique",
            Constraint::CustomerEmailFormat => "customers_email_format",
            Constraint::CustomerNameLength => "customers_name_length",
            Constraint::CustomerPhoneLength => "customers_phone_length",
            Constraint::CustomerAddressLength => "customers_address_length",
            Constraint::CustomerAgeRange => "customers_age_range",
            Constraint::CustomerInterestsLength => "customers_interests_length",
            Constraint::CustomerFeelingsLength => "customers_feelings_length",
            Constraint::CustomerValuesLength => "customers_values_length",
            Constraint::CustomerOtherInfoLength => "customers_other_info_length",
            Constraint::ProfileEmailUnique => "profiles_email_unique",
            Constraint::ProfileRoleKnown => "profiles_role_known",
        }
    }

    /// Identifies the constraint named in a raw database message.
    pub fn classify(message: &str) -> Option<Constraint> {
        MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|marker| message.contains(marker)))
            .map(|(constraint, _)| *constraint)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A named constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(Constraint),

    /// A constraint rejected the write but could not be identified.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

fn constraint_error(kind: &str, message: String) -> RepositoryError {
    match Constraint::classify(&message) {
        Some(constraint) => RepositoryError::Constraint(constraint),
        None => RepositoryError::ConstraintViolation(format!("{kind} constraint violation: {message}")),
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,

            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => constraint_error("Unique", message),
                    DatabaseErrorKind::CheckViolation => constraint_error("Check", message),
                    DatabaseErrorKind::NotNullViolation => constraint_error("Not null", message),
                    DatabaseErrorKind::ForeignKeyViolation => RepositoryError::ConstraintViolation(
                        format!("Foreign key constraint violation: {message}"),
                    ),
                    _ => RepositoryError::DatabaseError(message),
                }
            }

            DieselError::SerializationError(e) => {
                RepositoryError::ValidationError(format!("Serialization error: {e}"))
            }

            DieselError::DeserializationError(e) => {
                RepositoryError::ValidationError(format!("Deserialization error: {e}"))
            }

            DieselError::QueryBuilderError(e) => {
                RepositoryError::ValidationError(format!("Query builder error: {e}"))
            }

            DieselError::RollbackTransaction => {
                RepositoryError::DatabaseError("Transaction rollback".to_string())
            }

            _ => RepositoryError::Unexpected(format!("Unexpected diesel error: {err}")),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(format!("Connection error: {err}"))
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(format!("Connection error: {err}"))
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sqlite_messages() {
        assert_eq!(
            Constraint::classify("UNIQUE constraint failed: customers.email"),
            Some(Constraint::CustomerEmailUnique)
        );
        assert_eq!(
            Constraint::classify("CHECK constraint failed: customers_age_range"),
            Some(Constraint::CustomerAgeRange)
        );
        assert_eq!(
            Constraint::classify("UNIQUE constraint failed: profiles.email"),
            Some(Constraint::ProfileEmailUnique)
        );
        assert_eq!(Constraint::classify("disk I/O error"), None);
    }

    #[test]
    fn every_constraint_is_classified_by_its_own_code() {
        for (constraint, _) in MARKERS {
            assert_eq!(Constraint::classify(constraint.code()), Some(*constraint));
        }
    }
}
