//! Error conversion glue between the domain and the store layer.
//!
//! The domain layer must not depend on repository error types, but rows that
//! fail domain constraints on load still need to surface as repository errors.

use pushkind_common::repository::errors::RepositoryError;

use crate::domain::types::TypeConstraintError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}
