//! Bounded diagnostic trace of the framing pipeline.
//!
//! Every processed frame appends one immutable [`TraceEntry`] to a
//! fixed-capacity ring buffer. At 30 fps the default capacity of 900
//! entries holds roughly 30 seconds of history. The buffer is cleared
//! whenever tracking is disabled.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraTransform, ClampedEdges, Measurement, SmoothedPosition};
use crate::detection::{BoundingBox, SourceSize, TimestampSecs};

/// Default ring capacity (~30 s at 30 fps).
pub const DEFAULT_TRACE_CAPACITY: usize = 900;

/// Immutable snapshot of one frame's full pipeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Frame counter, strictly increasing while tracking is active.
    pub frame: u64,

    /// Monotonic timestamp of the source frame.
    pub timestamp_secs: TimestampSecs,

    /// Source frame dimensions.
    pub source: SourceSize,

    /// Raw bounding box over all detected hands, if any.
    pub bbox: Option<BoundingBox>,

    /// Raw target measurement, `None` when no subject was detected.
    pub measurement: Option<Measurement>,

    /// Committed target after hysteresis.
    pub committed: Measurement,

    /// Smoothed estimate before speed limiting and clamping.
    pub smoothed: SmoothedPosition,

    /// Final output transform for this frame.
    pub output: CameraTransform,

    /// Edges the pan saturated against.
    pub edges: ClampedEdges,
}

/// Fixed-capacity ring buffer of trace entries, oldest evicted first.
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    entries: VecDeque<TraceEntry>,
    capacity: usize,
}

impl TraceBuffer {
    /// Create a buffer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: TraceEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest retained entry.
    pub fn front(&self) -> Option<&TraceEntry> {
        self.entries.front()
    }

    /// Most recent entry.
    pub fn back(&self) -> Option<&TraceEntry> {
        self.entries.back()
    }

    /// Iterate entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter()
    }

    /// Copy the current contents oldest-first.
    pub fn to_vec(&self) -> Vec<TraceEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CAPACITY)
    }
}

/// The configuration values recorded alongside an exported trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    pub padding: f64,
    pub smoothing_preset: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_threshold: f64,
    pub pan_threshold: f64,
}

/// On-demand serializable snapshot of the full trace buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceExport {
    /// Wall-clock time of the export (RFC 3339).
    pub exported_at: String,

    /// Pipeline configuration at export time.
    pub config: TraceConfig,

    /// Entries oldest-first.
    pub entries: Vec<TraceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PanOffset;

    fn entry(frame: u64) -> TraceEntry {
        TraceEntry {
            frame,
            timestamp_secs: frame as f64 / 30.0,
            source: SourceSize::default(),
            bbox: None,
            measurement: None,
            committed: Measurement::REST,
            smoothed: SmoothedPosition::INITIAL,
            output: CameraTransform::IDENTITY,
            edges: ClampedEdges::NONE,
        }
    }

    #[test]
    fn test_push_below_capacity_keeps_everything() {
        let mut buffer = TraceBuffer::new(5);
        for frame in 0..3 {
            buffer.push(entry(frame));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.front().unwrap().frame, 0);
        assert_eq!(buffer.back().unwrap().frame, 2);
    }

    #[test]
    fn test_push_at_capacity_evicts_oldest() {
        let mut buffer = TraceBuffer::new(3);
        for frame in 0..10 {
            buffer.push(entry(frame));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.front().unwrap().frame, 7);
        assert_eq!(buffer.back().unwrap().frame, 9);
    }

    #[test]
    fn test_iteration_is_oldest_first() {
        let mut buffer = TraceBuffer::new(4);
        for frame in 0..6 {
            buffer.push(entry(frame));
        }
        let frames: Vec<u64> = buffer.iter().map(|e| e.frame).collect();
        assert_eq!(frames, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut buffer = TraceBuffer::new(4);
        buffer.push(entry(0));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn test_zero_capacity_is_bumped_to_one() {
        let mut buffer = TraceBuffer::new(0);
        buffer.push(entry(0));
        buffer.push(entry(1));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.back().unwrap().frame, 1);
    }

    #[test]
    fn test_export_roundtrip() {
        let export = TraceExport {
            exported_at: "2026-08-29T00:00:00Z".to_string(),
            config: TraceConfig {
                padding: 2.0,
                smoothing_preset: "exponential".to_string(),
                min_zoom: 1.0,
                max_zoom: 4.0,
                zoom_threshold: 0.15,
                pan_threshold: 0.05,
            },
            entries: vec![TraceEntry {
                measurement: Some(Measurement::new(PanOffset::new(0.1, -0.1), 2.0)),
                ..entry(42)
            }],
        };

        let json = serde_json::to_string_pretty(&export).unwrap();
        let parsed: TraceExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].frame, 42);
        assert_eq!(parsed.config, export.config);
    }
}
