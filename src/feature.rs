use crate::{
    config::FeatureConfig,
    types::{BodyPart, ExerciseKind, Keypoint, PoseFrame},
};

const MIN_SEGMENT: f32 = 1e-4;

/// Scalar measurement an exercise is classified on, with the confidence of
/// the weakest keypoint that went into it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feature {
    /// Interior knee angle in degrees.
    KneeAngle { degrees: f32, min_confidence: f32 },
    /// Mean wrist-minus-shoulder vertical offset in shoulder widths.
    /// Negative means the wrists are above the shoulders.
    WristOffset { offset: f32, min_confidence: f32 },
}

impl Feature {
    pub fn min_confidence(&self) -> f32 {
        match *self {
            Feature::KneeAngle { min_confidence, .. } => min_confidence,
            Feature::WristOffset { min_confidence, .. } => min_confidence,
        }
    }
}

/// The frame lacks the confident keypoints an exercise needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not enough confident keypoints")]
pub struct InsufficientData;

pub type FeatureResult = Result<Feature, InsufficientData>;

/// Computes the feature `kind` is classified on.
pub fn extract_feature(frame: &PoseFrame, kind: ExerciseKind, cfg: &FeatureConfig) -> FeatureResult {
    let feature = match kind {
        ExerciseKind::Squat => squat_feature(frame, cfg),
        ExerciseKind::JumpingJack => jumping_jack_feature(frame, cfg),
    };
    feature.ok_or(InsufficientData)
}

fn squat_feature(frame: &PoseFrame, cfg: &FeatureConfig) -> Option<Feature> {
    let left = leg_angle(
        frame,
        [BodyPart::LeftHip, BodyPart::LeftKnee, BodyPart::LeftAnkle],
        cfg,
    );
    let right = leg_angle(
        frame,
        [BodyPart::RightHip, BodyPart::RightKnee, BodyPart::RightAnkle],
        cfg,
    );

    let (degrees, min_confidence) = match (left, right) {
        (Some(l), Some(r)) => {
            if r.1 > l.1 {
                r
            } else {
                l
            }
        }
        (Some(side), None) | (None, Some(side)) => side,
        (None, None) => return None,
    };

    Some(Feature::KneeAngle {
        degrees,
        min_confidence,
    })
}

fn leg_angle(frame: &PoseFrame, parts: [BodyPart; 3], cfg: &FeatureConfig) -> Option<(f32, f32)> {
    let hip = confident(frame, parts[0], cfg)?;
    let knee = confident(frame, parts[1], cfg)?;
    let ankle = confident(frame, parts[2], cfg)?;

    let angle = joint_angle(hip.position(), knee.position(), ankle.position())?;
    let min_confidence = hip.confidence.min(knee.confidence).min(ankle.confidence);
    Some((angle, min_confidence))
}

fn jumping_jack_feature(frame: &PoseFrame, cfg: &FeatureConfig) -> Option<Feature> {
    let left_shoulder = confident(frame, BodyPart::LeftShoulder, cfg)?;
    let right_shoulder = confident(frame, BodyPart::RightShoulder, cfg)?;
    let left_wrist = confident(frame, BodyPart::LeftWrist, cfg)?;
    let right_wrist = confident(frame, BodyPart::RightWrist, cfg)?;

    let shoulder_span = distance(left_shoulder.position(), right_shoulder.position());
    if shoulder_span < MIN_SEGMENT {
        return None;
    }

    let left_offset = left_wrist.y - left_shoulder.y;
    let right_offset = right_wrist.y - right_shoulder.y;
    let offset = (left_offset + right_offset) / 2.0 / shoulder_span;

    let min_confidence = [left_shoulder, right_shoulder, left_wrist, right_wrist]
        .iter()
        .map(|kp| kp.confidence)
        .fold(1.0_f32, f32::min);

    Some(Feature::WristOffset {
        offset,
        min_confidence,
    })
}

fn confident<'a>(frame: &'a PoseFrame, part: BodyPart, cfg: &FeatureConfig) -> Option<&'a Keypoint> {
    frame
        .get(part)
        .filter(|kp| kp.confidence >= cfg.min_keypoint_confidence)
}

/// Interior angle at `vertex` in degrees, `None` for degenerate segments.
pub fn joint_angle(a: (f32, f32), vertex: (f32, f32), b: (f32, f32)) -> Option<f32> {
    let v1 = (a.0 - vertex.0, a.1 - vertex.1);
    let v2 = (b.0 - vertex.0, b.1 - vertex.1);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 < MIN_SEGMENT || mag2 < MIN_SEGMENT {
        return None;
    }

    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kp(part: BodyPart, x: f32, y: f32, confidence: f32) -> Keypoint {
        Keypoint::new(part, x, y, confidence)
    }

    #[test]
    fn straight_leg_is_180_degrees() {
        let angle = joint_angle((0.0, 0.0), (0.0, 1.0), (0.0, 2.0)).unwrap();
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn right_angle_knee() {
        let angle = joint_angle((0.0, 0.0), (0.0, 1.0), (1.0, 1.0)).unwrap();
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn degenerate_segment_has_no_angle() {
        assert!(joint_angle((1.0, 1.0), (1.0, 1.0), (2.0, 2.0)).is_none());
    }

    #[test]
    fn squat_uses_the_more_confident_side() {
        let frame = PoseFrame::from_keypoints([
            kp(BodyPart::LeftHip, 0.0, 0.0, 0.6),
            kp(BodyPart::LeftKnee, 0.0, 1.0, 0.6),
            kp(BodyPart::LeftAnkle, 0.0, 2.0, 0.6),
            kp(BodyPart::RightHip, 5.0, 0.0, 0.9),
            kp(BodyPart::RightKnee, 5.0, 1.0, 0.95),
            kp(BodyPart::RightAnkle, 6.0, 1.0, 0.9),
        ]);
        match extract_feature(&frame, ExerciseKind::Squat, &FeatureConfig::default()) {
            Ok(Feature::KneeAngle {
                degrees,
                min_confidence,
            }) => {
                assert!((degrees - 90.0).abs() < 0.01);
                assert!((min_confidence - 0.9).abs() < 1e-6);
            }
            other => panic!("unexpected feature {other:?}"),
        }
    }

    #[test]
    fn squat_needs_a_full_confident_leg() {
        let frame = PoseFrame::from_keypoints([
            kp(BodyPart::LeftHip, 0.0, 0.0, 0.9),
            kp(BodyPart::LeftKnee, 0.0, 1.0, 0.3),
            kp(BodyPart::LeftAnkle, 0.0, 2.0, 0.9),
            kp(BodyPart::RightHip, 5.0, 0.0, 0.9),
            kp(BodyPart::RightKnee, 5.0, 1.0, 0.9),
        ]);
        assert_eq!(
            extract_feature(&frame, ExerciseKind::Squat, &FeatureConfig::default()),
            Err(InsufficientData)
        );
    }

    #[test]
    fn hands_above_shoulders_give_negative_offset() {
        let frame = PoseFrame::from_keypoints([
            kp(BodyPart::LeftShoulder, 100.0, 200.0, 0.9),
            kp(BodyPart::RightShoulder, 200.0, 200.0, 0.8),
            kp(BodyPart::LeftWrist, 90.0, 100.0, 0.9),
            kp(BodyPart::RightWrist, 210.0, 120.0, 0.9),
        ]);
        match extract_feature(&frame, ExerciseKind::JumpingJack, &FeatureConfig::default()) {
            Ok(Feature::WristOffset {
                offset,
                min_confidence,
            }) => {
                assert!((offset + 0.9).abs() < 1e-5);
                assert!((min_confidence - 0.8).abs() < 1e-6);
            }
            other => panic!("unexpected feature {other:?}"),
        }
    }

    #[test]
    fn jumping_jack_needs_both_wrists() {
        let frame = PoseFrame::from_keypoints([
            kp(BodyPart::LeftShoulder, 100.0, 200.0, 0.9),
            kp(BodyPart::RightShoulder, 200.0, 200.0, 0.9),
            kp(BodyPart::LeftWrist, 90.0, 100.0, 0.9),
        ]);
        assert!(
            extract_feature(&frame, ExerciseKind::JumpingJack, &FeatureConfig::default())
                .is_err()
        );
    }

    #[test]
    fn empty_frame_is_insufficient() {
        let frame = PoseFrame::default();
        for kind in ExerciseKind::ALL {
            assert!(extract_feature(&frame, kind, &FeatureConfig::default()).is_err());
        }
    }
}
