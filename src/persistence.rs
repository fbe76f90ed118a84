use crate::timer::parse_mm_ss;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("user not authenticated")]
    NotAuthenticated,
    #[error("backend rejected the workout: {0}")]
    Rejected(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("invalid duration `{0}`, expected mm:ss")]
    InvalidDuration(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggedSession {
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserData {
    pub username: String,
    pub total_points: u64,
}

/// Backend that records finished workouts and awards points.
///
/// `log_session` is not idempotent: every call creates a history record.
pub trait SessionStore {
    fn log_session(
        &mut self,
        exercise: &str,
        reps: u32,
        duration_mm_ss: &str,
    ) -> Result<LoggedSession, PersistenceError>;

    fn user_data(&self) -> Result<UserData, PersistenceError>;
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn log_session(
        &mut self,
        exercise: &str,
        reps: u32,
        duration_mm_ss: &str,
    ) -> Result<LoggedSession, PersistenceError> {
        (**self).log_session(exercise, reps, duration_mm_ss)
    }

    fn user_data(&self) -> Result<UserData, PersistenceError> {
        (**self).user_data()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkoutRecord {
    pub exercise: String,
    pub reps: u32,
    pub points: u32,
    pub duration_seconds: u64,
}

/// In-process store with a single user, one point per rep.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    username: Option<String>,
    total_points: u64,
    history: Vec<WorkoutRecord>,
}

impl MemoryStore {
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[WorkoutRecord] {
        &self.history
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }
}

impl SessionStore for MemoryStore {
    fn log_session(
        &mut self,
        exercise: &str,
        reps: u32,
        duration_mm_ss: &str,
    ) -> Result<LoggedSession, PersistenceError> {
        if self.username.is_none() {
            return Err(PersistenceError::NotAuthenticated);
        }
        let duration_seconds = parse_mm_ss(duration_mm_ss)
            .ok_or_else(|| PersistenceError::InvalidDuration(duration_mm_ss.to_string()))?;

        let points = reps;
        self.history.push(WorkoutRecord {
            exercise: exercise.to_string(),
            reps,
            points,
            duration_seconds,
        });
        self.total_points += u64::from(points);
        log::info!(
            "logged {exercise}: {reps} reps in {duration_mm_ss}, total points {}",
            self.total_points
        );

        Ok(LoggedSession { points })
    }

    fn user_data(&self) -> Result<UserData, PersistenceError> {
        let username = self
            .username
            .clone()
            .ok_or(PersistenceError::NotAuthenticated)?;
        Ok(UserData {
            username,
            total_points: self.total_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_awards_a_point_per_rep() {
        let mut store = MemoryStore::signed_in("ada");
        let logged = store.log_session("squat", 12, "01:30").unwrap();
        assert_eq!(logged.points, 12);
        store.log_session("jumping-jack", 3, "00:20").unwrap();

        assert_eq!(store.total_points(), 15);
        assert_eq!(
            store.history()[0],
            WorkoutRecord {
                exercise: "squat".to_string(),
                reps: 12,
                points: 12,
                duration_seconds: 90,
            }
        );
        assert_eq!(
            store.user_data().unwrap(),
            UserData {
                username: "ada".to_string(),
                total_points: 15
            }
        );
    }

    #[test]
    fn signed_out_store_refuses() {
        let mut store = MemoryStore::signed_out();
        assert_eq!(
            store.log_session("squat", 1, "00:10"),
            Err(PersistenceError::NotAuthenticated)
        );
        assert_eq!(store.user_data(), Err(PersistenceError::NotAuthenticated));
        assert!(store.history().is_empty());
    }

    #[test]
    fn malformed_duration_is_rejected() {
        let mut store = MemoryStore::signed_in("ada");
        assert_eq!(
            store.log_session("squat", 1, "ten seconds"),
            Err(PersistenceError::InvalidDuration("ten seconds".to_string()))
        );
        assert_eq!(store.total_points(), 0);
    }
}
