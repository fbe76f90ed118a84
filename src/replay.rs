//! Recorded pose streams, one JSON object per line:
//!
//! ```text
//! {"t_ms": 0, "keypoints": [{"part": "leftHip", "x": 310.0, "y": 240.5, "score": 0.93}]}
//! ```

use std::{
    io::{self, BufRead},
    time::Duration,
};

use serde::Deserialize;

use crate::types::{BodyPart, Keypoint, PoseFrame};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read pose log")]
    Io(#[from] io::Error),
    #[error("malformed pose frame on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct FrameRecord {
    t_ms: u64,
    #[serde(default)]
    keypoints: Vec<KeypointRecord>,
}

#[derive(Deserialize)]
struct KeypointRecord {
    part: BodyPart,
    x: f32,
    y: f32,
    #[serde(alias = "confidence")]
    score: f32,
}

/// A frame with its offset from the start of the recording.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedFrame {
    pub offset: Duration,
    pub frame: PoseFrame,
}

pub fn parse_frame_line(line: &str) -> Result<TimedFrame, serde_json::Error> {
    let record: FrameRecord = serde_json::from_str(line)?;
    let frame = PoseFrame::from_keypoints(
        record
            .keypoints
            .into_iter()
            .map(|kp| Keypoint::new(kp.part, kp.x, kp.y, kp.score)),
    );
    Ok(TimedFrame {
        offset: Duration::from_millis(record.t_ms),
        frame,
    })
}

/// Reads every frame of a log, skipping blank lines.
pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<TimedFrame>, ReplayError> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = parse_frame_line(&line).map_err(|source| ReplayError::Parse {
            line: idx + 1,
            source,
        })?;
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posenet_part_names() {
        let timed = parse_frame_line(
            r#"{"t_ms": 1500, "keypoints": [
                {"part": "leftShoulder", "x": 1.0, "y": 2.0, "score": 0.8},
                {"part": "rightWrist", "x": 3.0, "y": 4.0, "confidence": 0.6}
            ]}"#,
        )
        .unwrap();
        assert_eq!(timed.offset, Duration::from_millis(1500));
        assert_eq!(
            timed.frame.get(BodyPart::LeftShoulder).copied(),
            Some(Keypoint::new(BodyPart::LeftShoulder, 1.0, 2.0, 0.8))
        );
        assert_eq!(
            timed.frame.get(BodyPart::RightWrist).map(|k| k.confidence),
            Some(0.6)
        );
    }

    #[test]
    fn reports_the_bad_line() {
        let log = "{\"t_ms\": 0, \"keypoints\": []}\n\n{\"t_ms\": oops}\n";
        match read_frames(log.as_bytes()) {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn skips_blank_lines() {
        let log = "\n{\"t_ms\": 0}\n   \n{\"t_ms\": 33}\n";
        let frames = read_frames(log.as_bytes()).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].frame.is_empty());
        assert_eq!(frames[1].offset, Duration::from_millis(33));
    }
}
