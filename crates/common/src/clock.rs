//! Clock utilities for tracking sessions.
//!
//! Pipeline timestamps are monotonic seconds supplied by the host's frame
//! clock; this module only anchors them to wall-clock time for diagnostics
//! and trace export.

use std::time::Instant;

/// A session clock anchored to the moment tracking was enabled.
///
/// Provides monotonic elapsed time for driving the pipeline offline and a
/// wall-clock anchor (RFC 3339) for trace exports.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Monotonic seconds elapsed since the session started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Current wall-clock time as an RFC 3339 string.
    pub fn now_wall() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

/// Synthesize the timestamp of frame `n` at a fixed frame rate.
///
/// Used by offline drivers that replay detection logs without real capture
/// timestamps.
pub fn frame_timestamp_secs(frame: u64, frame_rate_hz: u32) -> f64 {
    frame as f64 / frame_rate_hz.max(1) as f64
}
