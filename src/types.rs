use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::timer::format_mm_ss;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const COUNT: usize = 17;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Nose => "nose",
            BodyPart::LeftEye => "leftEye",
            BodyPart::RightEye => "rightEye",
            BodyPart::LeftEar => "leftEar",
            BodyPart::RightEar => "rightEar",
            BodyPart::LeftShoulder => "leftShoulder",
            BodyPart::RightShoulder => "rightShoulder",
            BodyPart::LeftElbow => "leftElbow",
            BodyPart::RightElbow => "rightElbow",
            BodyPart::LeftWrist => "leftWrist",
            BodyPart::RightWrist => "rightWrist",
            BodyPart::LeftHip => "leftHip",
            BodyPart::RightHip => "rightHip",
            BodyPart::LeftKnee => "leftKnee",
            BodyPart::RightKnee => "rightKnee",
            BodyPart::LeftAnkle => "leftAnkle",
            BodyPart::RightAnkle => "rightAnkle",
        }
    }
}

/// A detected body landmark in image coordinates (smaller `y` is higher).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub part: BodyPart,
    pub x: f32,
    pub y: f32,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            part,
            x,
            y,
            confidence,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Keypoints detected for one instant, at most one per body part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseFrame {
    keypoints: [Option<Keypoint>; BodyPart::COUNT],
}

impl PoseFrame {
    /// Builds a frame keeping the first occurrence of every body part.
    ///
    /// Keypoints with non-finite coordinates are dropped and confidences are
    /// clamped into `[0, 1]`.
    pub fn from_keypoints<I>(keypoints: I) -> Self
    where
        I: IntoIterator<Item = Keypoint>,
    {
        let mut frame = PoseFrame::default();
        for kp in keypoints {
            if !kp.x.is_finite() || !kp.y.is_finite() {
                log::debug!("dropping {} with non-finite position", kp.part.name());
                continue;
            }
            let slot = &mut frame.keypoints[kp.part.index()];
            if slot.is_some() {
                log::warn!(
                    "duplicate keypoint for {} in pose frame, keeping the first",
                    kp.part.name()
                );
                continue;
            }
            let confidence = if kp.confidence.is_nan() {
                0.0
            } else {
                kp.confidence.clamp(0.0, 1.0)
            };
            *slot = Some(Keypoint { confidence, ..kp });
        }
        frame
    }

    pub fn get(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints[part.index()].as_ref()
    }

    pub fn len(&self) -> usize {
        self.keypoints.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter().flatten()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    Squat,
    JumpingJack,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 2] = [ExerciseKind::Squat, ExerciseKind::JumpingJack];

    pub fn slug(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::JumpingJack => "jumping-jack",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "Squat",
            ExerciseKind::JumpingJack => "Jumping jack",
        }
    }

    /// The two labels whose alternation counts as repetitions.
    pub fn label_pair(&self) -> (Label, Label) {
        match self {
            ExerciseKind::Squat => (Label::Standing, Label::Squatting),
            ExerciseKind::JumpingJack => (Label::HandsDown, Label::HandsUp),
        }
    }

    pub fn owns(&self, label: Label) -> bool {
        let (a, b) = self.label_pair();
        label == a || label == b
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            ExerciseKind::Squat => &[
                "Stand with feet shoulder-width apart",
                "Keep your back straight and chest up",
                "Lower your body by bending your knees",
                "Go down until thighs are parallel to the floor",
                "Push through your heels to return to standing position",
            ],
            ExerciseKind::JumpingJack => &[
                "Stand upright with your legs together, arms at your sides",
                "Bend your knees slightly, and jump into the air",
                "As you jump, spread your legs to about shoulder-width apart",
                "Simultaneously raise your arms out and over your head",
                "Jump back to starting position with arms at sides",
                "Repeat movement rapidly",
            ],
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exercise `{0}`, expected one of: squat, jumping-jack")]
pub struct UnknownExercise(pub String);

impl FromStr for ExerciseKind {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| UnknownExercise(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Label {
    Standing,
    Squatting,
    HandsDown,
    HandsUp,
    #[default]
    Unknown,
}

impl Label {
    pub fn text(&self) -> &'static str {
        match self {
            Label::Standing => "standing",
            Label::Squatting => "squatting",
            Label::HandsDown => "hands-down",
            Label::HandsUp => "hands-up",
            Label::Unknown => "-",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Label::Unknown)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub label: Label,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: Label, confidence: f32) -> Self {
        Self { label, confidence }
    }

    pub fn unknown() -> Self {
        Self {
            label: Label::Unknown,
            confidence: 0.0,
        }
    }
}

/// Produced once when a session is finalized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub exercise: ExerciseKind,
    pub reps: u32,
    pub duration_seconds: u64,
}

impl SessionSummary {
    pub fn duration_text(&self) -> String {
        format_mm_ss(Duration::from_secs(self.duration_seconds))
    }
}

/// Snapshot of what the user sees while exercising.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveReadout {
    pub exercise: ExerciseKind,
    pub label: Option<Label>,
    pub confidence: f32,
    pub reps: u32,
    pub elapsed: Duration,
    pub paused: bool,
}

impl LiveReadout {
    pub fn status_text(&self) -> &'static str {
        if self.paused {
            return "PAUSED";
        }
        match self.label {
            Some(label) if label.is_known() => label.text(),
            _ => "Waiting for pose...",
        }
    }

    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    pub fn elapsed_text(&self) -> String {
        format_mm_ss(self.elapsed)
    }

    pub fn display_text(&self) -> String {
        if self.paused {
            format!("{} | {} reps | {}", self.status_text(), self.reps, self.elapsed_text())
        } else {
            format!(
                "{} ({}%) | {} reps | {}",
                self.status_text(),
                self.confidence_percent(),
                self.reps,
                self.elapsed_text()
            )
        }
    }
}
