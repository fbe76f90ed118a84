pub mod worker;

// Re-exports for convenience
pub use worker::{SessionCommand, SessionEvent, run_session_loop, start_session_worker};
