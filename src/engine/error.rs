//! Failure surface for awaited deferred actions.

use thiserror::Error;
use tokio::task::JoinError;

/// Errors observable when awaiting a [`Dispatched`](crate::Dispatched)
/// handle.
///
/// A failed deferred action never merges anything: the error is visible
/// only to a caller that awaits the handle. Fire-and-forget callers see the
/// runtime's default task behavior instead.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The deferred stage panicked before producing a result.
    #[error("deferred action failed: {0}")]
    Failed(String),

    /// The runtime tore the task down before it resolved.
    #[error("deferred action was cancelled before it resolved")]
    Cancelled,
}

impl From<JoinError> for ActionError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            ActionError::Cancelled
        } else {
            ActionError::Failed(err.to_string())
        }
    }
}
