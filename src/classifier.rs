use crate::{
    config::ClassifierConfig,
    feature::{Feature, FeatureResult},
    types::{Classification, ExerciseKind, Label},
};

/// Maps a feature to a label with a confidence.
///
/// Values inside the band between the two cutoffs of an exercise classify as
/// `Unknown`, which keeps the label from flapping at a single boundary. The
/// confidence grows linearly with the distance past the cutoff and never
/// exceeds the confidence of the weakest keypoint behind the feature.
pub fn classify(feature: &FeatureResult, kind: ExerciseKind, cfg: &ClassifierConfig) -> Classification {
    let feature = match feature {
        Ok(feature) => *feature,
        Err(_) => return Classification::unknown(),
    };

    let (label, margin, saturation) = match (kind, feature) {
        (ExerciseKind::Squat, Feature::KneeAngle { degrees, .. }) => {
            let t = &cfg.squat;
            if degrees <= t.deep_angle {
                (Label::Squatting, t.deep_angle - degrees, t.saturation_margin)
            } else if degrees >= t.standing_angle {
                (Label::Standing, degrees - t.standing_angle, t.saturation_margin)
            } else {
                return Classification::unknown();
            }
        }
        (ExerciseKind::JumpingJack, Feature::WristOffset { offset, .. }) => {
            let t = &cfg.jumping_jack;
            if offset <= t.up_offset {
                (Label::HandsUp, t.up_offset - offset, t.saturation_margin)
            } else if offset >= t.down_offset {
                (Label::HandsDown, offset - t.down_offset, t.saturation_margin)
            } else {
                return Classification::unknown();
            }
        }
        (kind, feature) => {
            log::debug!("feature {feature:?} does not apply to {kind}");
            return Classification::unknown();
        }
    };

    let confidence = margin_confidence(margin, saturation, cfg.margin_floor)
        .min(feature.min_confidence())
        .clamp(0.0, 1.0);

    Classification::new(label, confidence)
}

fn margin_confidence(margin: f32, saturation: f32, floor: f32) -> f32 {
    let ratio = if saturation > 0.0 {
        (margin / saturation).clamp(0.0, 1.0)
    } else {
        1.0
    };
    floor + (1.0 - floor) * ratio
}
