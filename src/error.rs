//! Error types for the records registry
//!
//! The browse core (builder, normalizer) is infallible by design: every
//! malformed input has a defined fallback. Errors only arise from admin
//! record management, where validation failures must reach the caller.

use thiserror::Error;

/// Validation and integrity errors from the in-memory records registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("role name '{name}' already exists")]
    DuplicateRoleName { name: String },

    #[error("country ISO code '{iso_code}' already exists")]
    DuplicateIsoCode { iso_code: String },

    #[error("role {id} not found")]
    UnknownRole { id: i64 },

    #[error("country {id} not found")]
    UnknownCountry { id: i64 },

    #[error("user {id} not found")]
    UnknownUser { id: i64 },

    #[error("threshold {id} not found")]
    UnknownThreshold { id: i64 },

    #[error("role {id} is referenced by users or thresholds and cannot be deleted")]
    RoleInUse { id: i64 },

    #[error("country {id} is referenced by users or thresholds and cannot be deleted")]
    CountryInUse { id: i64 },

    #[error("threshold limit {limit_minor} must not be negative")]
    NegativeLimit { limit_minor: i64 },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RegistryError::DuplicateIsoCode {
            iso_code: "CH".into(),
        };
        assert_eq!(err.to_string(), "country ISO code 'CH' already exists");

        let err = RegistryError::RoleInUse { id: 3 };
        assert!(err.to_string().contains("cannot be deleted"));
    }
}
