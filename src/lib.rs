//! Turns a stream of body keypoints into a live exercise label, a rep count,
//! an elapsed time and, once the user finishes, a saved session summary.
//!
//! Frames flow through [`feature::extract_feature`], [`classifier::classify`]
//! and a [`tracker::TransitionTracker`], all owned by an
//! [`session::ExerciseSession`] together with its [`timer::SessionTimer`].

pub mod classifier;
pub mod config;
pub mod error;
pub mod feature;
pub mod persistence;
pub mod pipeline;
pub mod replay;
pub mod session;
pub mod timer;
pub mod tracker;
pub mod types;

pub use config::SessionConfig;
pub use error::SessionError;
pub use persistence::{MemoryStore, PersistenceError, SessionStore};
pub use session::{ExerciseSession, FinishedSession, SessionPhase};
pub use types::{
    BodyPart, Classification, ExerciseKind, Keypoint, Label, LiveReadout, PoseFrame,
    SessionSummary,
};
