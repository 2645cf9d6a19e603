//! Detection input types for the framing pipeline.
//!
//! One `DetectionFrame` arrives per displayable frame from the external
//! hand-landmark detector. Frames are ephemeral: the pipeline consumes them
//! and retains nothing beyond derived state. For offline replay, frames can
//! be stored in append-only JSONL format, one frame per line.
//!
//! All landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! source frame dimensions.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in fractional seconds since session start.
pub type TimestampSecs = f64;

/// A 2D point normalized against the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0].
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered landmark points belonging to one detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    /// Landmark points in detector order.
    pub points: Vec<NormalizedPoint>,
}

impl HandObservation {
    pub fn new(points: Vec<NormalizedPoint>) -> Self {
        Self { points }
    }

    /// Build an observation from `(x, y)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self {
            points: pairs
                .iter()
                .map(|&(x, y)| NormalizedPoint::new(x, y))
                .collect(),
        }
    }

    /// A malformed observation carries no points and is skipped upstream.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Source frame dimensions in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSize {
    pub width: u32,
    pub height: u32,
}

impl SourceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SourceSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// One frame's worth of detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    /// Monotonic seconds since session start.
    #[serde(rename = "t")]
    pub timestamp_secs: TimestampSecs,

    /// Source frame dimensions.
    pub source: SourceSize,

    /// Zero or more detected hands.
    pub hands: Vec<HandObservation>,
}

impl DetectionFrame {
    /// A frame with no detected subject.
    pub fn empty(timestamp_secs: TimestampSecs, source: SourceSize) -> Self {
        Self {
            timestamp_secs,
            source,
            hands: vec![],
        }
    }

    /// A frame containing a single hand.
    pub fn single_hand(
        timestamp_secs: TimestampSecs,
        source: SourceSize,
        hand: HandObservation,
    ) -> Self {
        Self {
            timestamp_secs,
            source,
            hands: vec![hand],
        }
    }

    /// Total landmark count across all hands.
    pub fn point_count(&self) -> usize {
        self.hands.iter().map(|h| h.points.len()).sum()
    }

    /// Whether the frame contains at least one non-empty hand.
    pub fn has_subject(&self) -> bool {
        self.hands.iter().any(|h| !h.is_empty())
    }
}

/// Axis-aligned bounding box in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The box enclosing every point of every non-empty hand, or `None`
    /// when nothing remains after skipping empty observations.
    pub fn enclosing(hands: &[HandObservation]) -> Option<Self> {
        let mut bbox: Option<BoundingBox> = None;

        for hand in hands.iter().filter(|h| !h.is_empty()) {
            for point in &hand.points {
                match &mut bbox {
                    None => {
                        bbox = Some(BoundingBox {
                            min_x: point.x,
                            min_y: point.y,
                            max_x: point.x,
                            max_y: point.y,
                        });
                    }
                    Some(b) => {
                        b.min_x = b.min_x.min(point.x);
                        b.min_y = b.min_y.min(point.y);
                        b.max_x = b.max_x.max(point.x);
                        b.max_y = b.max_y.max(point.y);
                    }
                }
            }
        }

        bbox
    }

    /// Center of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Largest dimension of the box.
    pub fn size(&self) -> f64 {
        (self.max_x - self.min_x).max(self.max_y - self.min_y)
    }
}

/// Parse detection frames from JSONL content (one JSON object per line).
///
/// Lines starting with `#` and blank lines are skipped, matching the
/// append-only log convention used by recording tools.
pub fn parse_detections(jsonl: &str) -> Result<Vec<DetectionFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize detection frames to JSONL format.
pub fn serialize_detections(frames: &[DetectionFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame(t: f64) -> DetectionFrame {
        DetectionFrame::single_hand(
            t,
            SourceSize::default(),
            HandObservation::from_pairs(&[(0.4, 0.4), (0.6, 0.6)]),
        )
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = sample_frame(1.5);
        let json = serde_json::to_string(&frame).unwrap();
        let parsed: DetectionFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, parsed);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let frames = vec![
            DetectionFrame::empty(0.0, SourceSize::default()),
            sample_frame(1.0 / 60.0),
            sample_frame(2.0 / 60.0),
        ];
        let jsonl = serialize_detections(&frames).unwrap();
        let parsed = parse_detections(&jsonl).unwrap();
        assert_eq!(frames, parsed);
    }

    #[test]
    fn test_parse_skips_header_comment_and_blank_lines() {
        let jsonl = "# detections v1\n\n{\"t\":0.0,\"source\":{\"width\":1920,\"height\":1080},\"hands\":[]}\n";
        let parsed = parse_detections(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].timestamp_secs, 0.0);
    }

    #[test]
    fn test_enclosing_box_spans_all_hands() {
        let hands = vec![
            HandObservation::from_pairs(&[(0.2, 0.3), (0.4, 0.5)]),
            HandObservation::from_pairs(&[(0.7, 0.1)]),
        ];
        let bbox = BoundingBox::enclosing(&hands).unwrap();
        assert_eq!(bbox.min_x, 0.2);
        assert_eq!(bbox.min_y, 0.1);
        assert_eq!(bbox.max_x, 0.7);
        assert_eq!(bbox.max_y, 0.5);
    }

    #[test]
    fn test_enclosing_box_skips_empty_hands() {
        let hands = vec![
            HandObservation::new(vec![]),
            HandObservation::from_pairs(&[(0.5, 0.5)]),
        ];
        let bbox = BoundingBox::enclosing(&hands).unwrap();
        assert_eq!(bbox.center(), (0.5, 0.5));
        assert_eq!(bbox.size(), 0.0);

        assert!(BoundingBox::enclosing(&[HandObservation::new(vec![])]).is_none());
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_bbox_size_uses_largest_dimension() {
        let hands = vec![HandObservation::from_pairs(&[(0.1, 0.4), (0.6, 0.5)])];
        let bbox = BoundingBox::enclosing(&hands).unwrap();
        assert!((bbox.size() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_has_subject() {
        assert!(!DetectionFrame::empty(0.0, SourceSize::default()).has_subject());
        assert!(sample_frame(0.0).has_subject());

        let only_empty = DetectionFrame::single_hand(
            0.0,
            SourceSize::default(),
            HandObservation::new(vec![]),
        );
        assert!(!only_empty.has_subject());
    }
}
