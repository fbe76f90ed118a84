use crate::persistence::PersistenceError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session was already finalized, start a new one first")]
    AlreadyFinalized,
    #[error("failed to save session: {0}")]
    Persistence(#[from] PersistenceError),
}
