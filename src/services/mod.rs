//! Catalog workflows.
//!
//! Every function is stateless: it re-reads what it needs from the injected
//! repository, decides, and issues at most one mutating call. Reads and the
//! conditional write that follows are separate store calls, not a
//! transaction.

pub mod categories;
pub mod errors;
pub mod main;
pub mod products;

pub use errors::{ServiceError, ServiceResult};

/// Result of a create or update submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<Id, View> {
    /// The record was stored (or an identical one already existed).
    Saved(Id),
    /// Validation failed; the view carries errors and the echoed input.
    Rejected(View),
}

/// Runs two independent reads side by side and waits for both.
pub(crate) fn join_reads<A, B, FA, FB>(left: FA, right: FB) -> (A, B)
where
    FA: FnOnce() -> A + Send,
    FB: FnOnce() -> B + Send,
    A: Send,
    B: Send,
{
    std::thread::scope(|scope| {
        let right = scope.spawn(right);
        let left = left();
        match right.join() {
            Ok(right) => (left, right),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}
