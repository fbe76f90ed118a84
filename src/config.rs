//! Tunable thresholds. Defaults are the values the counter was tuned with.

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureConfig {
    /// Keypoints below this detection confidence count as missing.
    pub min_keypoint_confidence: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            min_keypoint_confidence: 0.5,
        }
    }
}

/// Knee angle cutoffs in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct SquatThresholds {
    pub deep_angle: f32,
    pub standing_angle: f32,
    /// Degrees past a cutoff at which the margin confidence saturates.
    pub saturation_margin: f32,
}

impl Default for SquatThresholds {
    fn default() -> Self {
        Self {
            deep_angle: 100.0,
            standing_angle: 160.0,
            saturation_margin: 20.0,
        }
    }
}

/// Wrist-minus-shoulder offsets, measured in shoulder widths.
#[derive(Clone, Debug, PartialEq)]
pub struct JumpingJackThresholds {
    pub up_offset: f32,
    pub down_offset: f32,
    pub saturation_margin: f32,
}

impl Default for JumpingJackThresholds {
    fn default() -> Self {
        Self {
            up_offset: -0.5,
            down_offset: 0.5,
            saturation_margin: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub squat: SquatThresholds,
    pub jumping_jack: JumpingJackThresholds,
    /// Confidence reported exactly at a cutoff; grows linearly to 1.0 with the margin.
    pub margin_floor: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            squat: SquatThresholds::default(),
            jumping_jack: JumpingJackThresholds::default(),
            margin_floor: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Classifications must be strictly more confident than this to be accepted.
    pub acceptance_threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.7,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    pub feature: FeatureConfig,
    pub classifier: ClassifierConfig,
    pub tracker: TrackerConfig,
}
