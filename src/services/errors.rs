use thiserror::Error;

/// Generic error type used by service layer functions.
///
/// Validation failures and blocked deletions are not errors: they come back
/// as [`super::Submission::Rejected`] and
/// [`super::categories::CategoryDeletion::Blocked`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The store failed; details are logged where it happened.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
