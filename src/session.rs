use std::time::Instant;

use crate::{
    classifier::classify,
    config::SessionConfig,
    error::SessionError,
    feature::extract_feature,
    persistence::SessionStore,
    timer::{SessionTimer, format_mm_ss, round_secs},
    tracker::{Observation, SessionState, TransitionTracker},
    types::{Classification, ExerciseKind, LiveReadout, PoseFrame, SessionSummary},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Camera off, nothing accumulated.
    Idle,
    Running,
    Paused,
    /// Handed to the store; a new `start` is needed before anything else counts.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub classification: Classification,
    pub observation: Observation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedSession {
    pub summary: SessionSummary,
    pub points: u32,
}

/// Builds the summary for the state accumulated so far.
pub fn summarize(
    state: &SessionState,
    timer: &SessionTimer,
    kind: ExerciseKind,
    now: Instant,
) -> SessionSummary {
    SessionSummary {
        exercise: kind,
        reps: state.reps(),
        duration_seconds: round_secs(timer.elapsed_at(now)),
    }
}

/// One exercise session: owns the rep counter and the timer and feeds every
/// pose frame through extraction, classification and debouncing.
#[derive(Clone, Debug)]
pub struct ExerciseSession {
    kind: ExerciseKind,
    cfg: SessionConfig,
    tracker: TransitionTracker,
    timer: SessionTimer,
    phase: SessionPhase,
    latest: Option<Classification>,
}

impl ExerciseSession {
    pub fn new(kind: ExerciseKind) -> Self {
        Self::with_config(kind, SessionConfig::default())
    }

    pub fn with_config(kind: ExerciseKind, cfg: SessionConfig) -> Self {
        let tracker = TransitionTracker::new(kind, cfg.tracker.clone());
        Self {
            kind,
            cfg,
            tracker,
            timer: SessionTimer::new(),
            phase: SessionPhase::Idle,
            latest: None,
        }
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.kind
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        self.tracker.state()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn rep_score(&self) -> u32 {
        self.tracker.rep_score()
    }

    pub fn reps(&self) -> u32 {
        self.tracker.reps()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begins consuming frames. Starting a finished session begins a fresh one.
    pub fn start_at(&mut self, now: Instant) {
        match self.phase {
            SessionPhase::Running | SessionPhase::Paused => {}
            SessionPhase::Idle | SessionPhase::Finished => {
                self.clear();
                self.timer.start_at(now);
                self.phase = SessionPhase::Running;
                log::info!("{} session started", self.kind);
            }
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.phase == SessionPhase::Running {
            self.timer.pause_at(now);
            self.tracker.set_paused(true);
            self.phase = SessionPhase::Paused;
            log::info!(
                "{} session paused at {}",
                self.kind,
                format_mm_ss(self.timer.elapsed_at(now))
            );
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn resume_at(&mut self, now: Instant) {
        if self.phase == SessionPhase::Paused {
            self.timer.resume_at(now);
            self.tracker.set_paused(false);
            self.phase = SessionPhase::Running;
            log::info!("{} session resumed", self.kind);
        }
    }

    /// Classifies `frame` without touching any session state.
    pub fn classify_frame(&self, frame: &PoseFrame) -> Classification {
        let feature = extract_feature(frame, self.kind, &self.cfg.feature);
        classify(&feature, self.kind, &self.cfg.classifier)
    }

    /// Feeds one frame through the counter. Frames are ignored unless the
    /// session is running.
    pub fn process_frame(&mut self, frame: &PoseFrame) -> Option<FrameOutcome> {
        if self.phase != SessionPhase::Running {
            return None;
        }

        let classification = self.classify_frame(frame);
        let observation = self.tracker.observe(&classification);
        self.latest = Some(classification);

        Some(FrameOutcome {
            classification,
            observation,
        })
    }

    pub fn readout(&self) -> LiveReadout {
        self.readout_at(Instant::now())
    }

    pub fn readout_at(&self, now: Instant) -> LiveReadout {
        LiveReadout {
            exercise: self.kind,
            label: self.latest.map(|c| c.label),
            confidence: self.latest.map(|c| c.confidence).unwrap_or(0.0),
            reps: self.reps(),
            elapsed: self.timer.elapsed_at(now),
            paused: self.phase == SessionPhase::Paused,
        }
    }

    pub fn summary_at(&self, now: Instant) -> SessionSummary {
        summarize(self.tracker.state(), &self.timer, self.kind, now)
    }

    pub fn finalize<S>(&mut self, store: &mut S) -> Result<FinishedSession, SessionError>
    where
        S: SessionStore + ?Sized,
    {
        self.finalize_at(store, Instant::now())
    }

    /// Pauses the session and hands its summary to `store` exactly once.
    ///
    /// On success the counter and timer are reset and the session is
    /// `Finished`. On failure nothing is reset, so calling again retries
    /// with the same reps and duration.
    pub fn finalize_at<S>(
        &mut self,
        store: &mut S,
        now: Instant,
    ) -> Result<FinishedSession, SessionError>
    where
        S: SessionStore + ?Sized,
    {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::Finished => {
                log::warn!("ignoring second finalize of {} session", self.kind);
                return Err(SessionError::AlreadyFinalized);
            }
            SessionPhase::Running | SessionPhase::Paused => {}
        }

        self.pause_at(now);
        let summary = self.summary_at(now);
        let duration = summary.duration_text();

        match store.log_session(self.kind.slug(), summary.reps, &duration) {
            Ok(logged) => {
                log::info!(
                    "{} session saved: {} reps in {duration}, {} points",
                    self.kind,
                    summary.reps,
                    logged.points
                );
                self.clear();
                self.phase = SessionPhase::Finished;
                Ok(FinishedSession {
                    summary,
                    points: logged.points,
                })
            }
            Err(err) => {
                log::warn!("failed to save {} session: {err}", self.kind);
                Err(err.into())
            }
        }
    }

    /// Drops everything accumulated without saving.
    pub fn abandon(&mut self) {
        if self.phase != SessionPhase::Idle {
            log::info!(
                "{} session abandoned with {} reps unsaved",
                self.kind,
                self.reps()
            );
        }
        self.clear();
        self.phase = SessionPhase::Idle;
    }

    fn clear(&mut self) {
        self.tracker.reset();
        self.timer.reset();
        self.latest = None;
    }
}
