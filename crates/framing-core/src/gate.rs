//! Hysteresis gating of framing measurements.
//!
//! Small frame-to-frame wobble in the detector output must not move the
//! camera. The gate keeps the last committed target until a new measurement
//! differs by more than the configured deadband on either axis group.
//! Losing the subject bypasses the deadband: the committed target snaps to
//! the rest state so the camera starts returning to center immediately
//! (optionally debounced over a few frames).

use autoframe_model::Measurement;

use crate::config::TrackingConfig;

/// Deadband gate holding the committed framing target.
#[derive(Debug, Clone)]
pub struct HysteresisGate {
    zoom_threshold: f64,
    pan_threshold: f64,
    loss_debounce_frames: u32,
    committed: Measurement,
    frames_without_subject: u32,
}

impl HysteresisGate {
    pub fn new(config: &TrackingConfig) -> Self {
        Self {
            zoom_threshold: config.zoom_threshold,
            pan_threshold: config.pan_threshold,
            loss_debounce_frames: config.loss_debounce_frames,
            committed: Measurement::REST,
            frames_without_subject: 0,
        }
    }

    /// Feed one frame's measurement and return the committed target.
    pub fn observe(&mut self, measurement: Option<Measurement>) -> Measurement {
        match measurement {
            Some(new) => {
                self.frames_without_subject = 0;

                let zoom_delta = (new.zoom - self.committed.zoom).abs();
                let pan_dist = new.pan.distance_to(&self.committed.pan);

                if zoom_delta > self.zoom_threshold || pan_dist > self.pan_threshold {
                    self.committed = new;
                }
            }
            None => {
                self.frames_without_subject = self.frames_without_subject.saturating_add(1);

                if self.frames_without_subject >= self.loss_debounce_frames.max(1) {
                    self.committed = Measurement::REST;
                }
            }
        }

        self.committed
    }

    /// The currently committed target.
    pub fn committed(&self) -> Measurement {
        self.committed
    }

    /// Return to the rest target and clear the loss counter.
    pub fn reset(&mut self) {
        self.committed = Measurement::REST;
        self.frames_without_subject = 0;
    }
}
