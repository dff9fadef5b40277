//! Unified error types surfaced by the runtime API.
//!
//! Wraps worker coordination failures and arbitration rejections so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub use action_core::Rejection;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("actor worker command channel closed")]
    CommandChannelClosed,

    #[error("actor worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("actor worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl RuntimeError {
    /// The arbitration rejection, if this error is one.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RuntimeError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}
