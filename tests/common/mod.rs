#![allow(dead_code)]

use pose_reps::{
    BodyPart, Keypoint, PoseFrame,
    persistence::{LoggedSession, PersistenceError, SessionStore, UserData},
};

pub fn squat_frame(knee_angle_deg: f32, confidence: f32) -> PoseFrame {
    let hip = (0.0_f32, 0.0_f32);
    let knee = (0.0_f32, 1.0_f32);
    // Rotate the shin away from the thigh by the requested interior angle.
    let theta = knee_angle_deg.to_radians();
    let ankle = (knee.0 + theta.sin(), knee.1 - theta.cos());
    PoseFrame::from_keypoints([
        Keypoint::new(BodyPart::LeftHip, hip.0, hip.1, confidence),
        Keypoint::new(BodyPart::LeftKnee, knee.0, knee.1, confidence),
        Keypoint::new(BodyPart::LeftAnkle, ankle.0, ankle.1, confidence),
    ])
}

pub fn jumping_jack_frame(hands_up: bool, confidence: f32) -> PoseFrame {
    let wrist_y = if hands_up { 50.0 } else { 350.0 };
    PoseFrame::from_keypoints([
        Keypoint::new(BodyPart::LeftShoulder, 150.0, 200.0, confidence),
        Keypoint::new(BodyPart::RightShoulder, 250.0, 200.0, confidence),
        Keypoint::new(BodyPart::LeftWrist, 120.0, wrist_y, confidence),
        Keypoint::new(BodyPart::RightWrist, 280.0, wrist_y, confidence),
    ])
}

/// Store that fails a fixed number of times before accepting sessions.
#[derive(Default)]
pub struct FlakyStore {
    pub failures_left: u32,
    pub calls: u32,
    pub logged: Vec<(String, u32, String)>,
}

impl FlakyStore {
    pub fn failing(times: u32) -> Self {
        Self {
            failures_left: times,
            ..Self::default()
        }
    }
}

impl SessionStore for FlakyStore {
    fn log_session(
        &mut self,
        exercise: &str,
        reps: u32,
        duration_mm_ss: &str,
    ) -> Result<LoggedSession, PersistenceError> {
        self.calls += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(PersistenceError::Unavailable("connection reset".to_string()));
        }
        self.logged
            .push((exercise.to_string(), reps, duration_mm_ss.to_string()));
        Ok(LoggedSession { points: reps })
    }

    fn user_data(&self) -> Result<UserData, PersistenceError> {
        Ok(UserData {
            username: "flaky".to_string(),
            total_points: self.logged.iter().map(|(_, reps, _)| u64::from(*reps)).sum(),
        })
    }
}
