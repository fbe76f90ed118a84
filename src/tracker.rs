use crate::{
    config::TrackerConfig,
    types::{Classification, ExerciseKind, Label},
};

/// Every repetition is counted as two accepted label changes: into the
/// working pose and back out of it.
pub const HALF_CYCLES_PER_REP: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    LowConfidence,
    Unknown,
    Unchanged,
    ForeignLabel,
}

/// What the tracker did with one classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    Rejected(RejectReason),
    /// First accepted label of the session. Never counted.
    Seeded(Label),
    Transitioned { from: Label, to: Label, counted: bool },
}

impl Observation {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Observation::Rejected(_))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Accepted half-cycles. Only ever grows until the session is reset.
    pub rep_score: u32,
    pub last_accepted_label: Label,
    pub is_paused: bool,
}

impl SessionState {
    pub fn reps(&self) -> u32 {
        self.rep_score / HALF_CYCLES_PER_REP
    }
}

/// Debounces classifications into label transitions and counts half-cycles.
///
/// Only confident, known labels that differ from the last accepted one are
/// taken. Holding a pose for many frames therefore counts once.
#[derive(Clone, Debug)]
pub struct TransitionTracker {
    kind: ExerciseKind,
    cfg: TrackerConfig,
    state: SessionState,
}

impl TransitionTracker {
    pub fn new(kind: ExerciseKind, cfg: TrackerConfig) -> Self {
        Self {
            kind,
            cfg,
            state: SessionState::default(),
        }
    }

    pub fn observe(&mut self, classification: &Classification) -> Observation {
        let Classification { label, confidence } = *classification;

        // Written negated so NaN confidences are rejected as well.
        if !(confidence > self.cfg.acceptance_threshold) {
            return Observation::Rejected(RejectReason::LowConfidence);
        }
        if !label.is_known() {
            return Observation::Rejected(RejectReason::Unknown);
        }
        if !self.kind.owns(label) {
            log::debug!("ignoring {label} while tracking {}", self.kind);
            return Observation::Rejected(RejectReason::ForeignLabel);
        }
        let from = self.state.last_accepted_label;
        if label == from {
            return Observation::Rejected(RejectReason::Unchanged);
        }

        self.state.last_accepted_label = label;
        if !from.is_known() {
            log::debug!("{} session seeded with {label}", self.kind);
            return Observation::Seeded(label);
        }

        let counted = self.completes_half_cycle(from, label);
        if counted {
            self.state.rep_score = self.state.rep_score.saturating_add(1);
        }
        log::debug!(
            "{from} -> {label} ({:.0}%), score {}",
            confidence * 100.0,
            self.state.rep_score
        );

        Observation::Transitioned {
            from,
            to: label,
            counted,
        }
    }

    fn completes_half_cycle(&self, from: Label, to: Label) -> bool {
        let (a, b) = self.kind.label_pair();
        (from == a && to == b) || (from == b && to == a)
    }

    pub fn rep_score(&self) -> u32 {
        self.state.rep_score
    }

    pub fn reps(&self) -> u32 {
        self.state.reps()
    }

    pub fn last_accepted_label(&self) -> Label {
        self.state.last_accepted_label
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.is_paused = paused;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.kind
    }

    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }
}
