//! The per-frame framing controller.
//!
//! Orchestrates the pipeline once per displayable frame:
//!
//! ```text
//! DetectionFrame -> extract -> gate -> smooth -> limit -> clamp
//!                -> internal snapshot (+ throttled snapshot + trace entry)
//! ```
//!
//! The controller keeps two output snapshots with different freshness
//! guarantees: the internal snapshot is rewritten every processed frame and
//! is the only value transform-critical consumers should read; the
//! observable snapshot is a periodic copy intended for UI/telemetry and may
//! lag up to one publish interval.
//!
//! The host owns the frame clock. It calls [`FramingController::step`] once
//! per displayable frame; invocations with an unchanged timestamp are
//! no-ops, so over-driving the controller is harmless.

use tracing::{debug, trace};

use autoframe_common::AutoframeResult;
use autoframe_model::{
    clamp_pan, CameraTransform, DetectionFrame, TimestampSecs, TraceBuffer, TraceEntry,
    TraceExport,
};

use crate::config::TrackingConfig;
use crate::gate::HysteresisGate;
use crate::limiter::{clamp_speed, SpeedLimit};
use crate::measure::{extract_measurement, target_bounding_box};
use crate::smoothing::{Smoother, SmoothingPreset};

/// Frame-loop camera controller. One instance per tracked view; all mutable
/// pipeline state is exclusively owned here.
#[derive(Debug)]
pub struct FramingController {
    config: TrackingConfig,
    enabled: bool,

    gate: HysteresisGate,
    smoother: Smoother,

    /// Previous frame's output, the speed-limit reference.
    previous: CameraTransform,

    /// Every-frame snapshot.
    internal: CameraTransform,

    /// Throttled snapshot, refreshed every `publish_interval` frames.
    observable: CameraTransform,

    trace: TraceBuffer,
    frame_counter: u64,
    last_timestamp: Option<TimestampSecs>,
}

impl FramingController {
    /// Build a controller, validating the configuration up front.
    pub fn new(config: TrackingConfig) -> AutoframeResult<Self> {
        config.validate()?;

        let smoother = Smoother::from_preset(config.preset, config.smooth_factor)?;
        let enabled = config.enabled;

        Ok(Self {
            gate: HysteresisGate::new(&config),
            smoother,
            previous: CameraTransform::IDENTITY,
            internal: CameraTransform::IDENTITY,
            observable: CameraTransform::IDENTITY,
            trace: TraceBuffer::new(config.trace_capacity),
            frame_counter: 0,
            last_timestamp: None,
            config,
            enabled,
        })
    }

    /// Build a controller with default configuration, enabled.
    pub fn enabled_with_defaults() -> Self {
        let config = TrackingConfig {
            enabled: true,
            ..TrackingConfig::default()
        };
        // Defaults are validated by a unit test; this cannot fail.
        Self::new(config).unwrap_or_else(|e| panic!("default config rejected: {e}"))
    }

    /// Enable or disable tracking.
    ///
    /// Enabling resets all mutable pipeline state to defaults. Disabling
    /// clears the trace buffer and makes `step` a no-op before the next
    /// invocation.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }

        if enabled {
            debug!("tracking enabled, resetting pipeline state");
            self.gate.reset();
            self.smoother.reset();
            self.previous = CameraTransform::IDENTITY;
            self.internal = CameraTransform::IDENTITY;
            self.observable = CameraTransform::IDENTITY;
            self.trace.clear();
            self.frame_counter = 0;
            self.last_timestamp = None;
        } else {
            debug!("tracking disabled, clearing trace");
            self.trace.clear();
        }

        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Switch the smoothing strategy, resetting the smoother only.
    ///
    /// Committed target, previous output, trace, and frame counter are
    /// untouched; the new filter starts from the rest state.
    pub fn set_preset(&mut self, preset: SmoothingPreset) -> AutoframeResult<()> {
        self.smoother = Smoother::from_preset(preset, self.config.smooth_factor)?;
        self.config.preset = preset;
        debug!(preset = preset.as_str(), "smoothing strategy switched");
        Ok(())
    }

    /// Process one frame of detector output.
    ///
    /// Returns the fresh internal transform, or `None` when tracking is
    /// disabled or the frame's timestamp has not advanced past the last
    /// processed one (duplicate invocation on an unchanged frame).
    pub fn step(&mut self, frame: &DetectionFrame) -> Option<CameraTransform> {
        if !self.enabled {
            return None;
        }

        if let Some(last) = self.last_timestamp {
            if frame.timestamp_secs <= last {
                return None;
            }
        }

        let bbox = target_bounding_box(frame);
        let measurement = extract_measurement(frame, &self.config);
        let committed = self.gate.observe(measurement);
        let smoothed = self.smoother.update(&committed);

        let limit = SpeedLimit::from_config(&self.config);
        let limited = clamp_speed(&self.previous, &smoothed, &limit, measurement.is_some());

        // The Kalman strategies carry velocity and can overshoot a step
        // target, so the smoothed zoom is re-clamped before publishing.
        let zoom = limited.zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        let (pan, edges) = clamp_pan(limited.pan(), zoom);

        let output = CameraTransform { zoom, pan, edges };

        self.previous = output;
        self.internal = output;
        self.frame_counter += 1;
        self.last_timestamp = Some(frame.timestamp_secs);

        self.trace.push(TraceEntry {
            frame: self.frame_counter,
            timestamp_secs: frame.timestamp_secs,
            source: frame.source,
            bbox,
            measurement,
            committed,
            smoothed,
            output,
            edges,
        });

        if self.frame_counter % u64::from(self.config.publish_interval) == 0 {
            self.observable = self.internal;
        }

        trace!(
            frame = self.frame_counter,
            zoom = output.zoom,
            pan_x = output.pan.x,
            pan_y = output.pan.y,
            "frame processed"
        );

        Some(output)
    }

    /// The every-frame snapshot. Transform-critical consumers read this
    /// each frame; it is always the most current value.
    pub fn transform(&self) -> CameraTransform {
        self.internal
    }

    /// The throttled snapshot for UI/telemetry. Never fresher than
    /// [`FramingController::transform`], and at most one publish interval
    /// behind it.
    pub fn observable(&self) -> CameraTransform {
        self.observable
    }

    /// Frames processed since tracking was last enabled.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Number of retained trace entries.
    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }

    /// Oldest-first view of the trace.
    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Per-axis smoother velocities `[vx, vy, vzoom]`, when the active
    /// strategy estimates them.
    pub fn smoother_velocities(&self) -> Option<[f64; 3]> {
        self.smoother.velocities()
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Snapshot the full trace buffer for export, independent of the two
    /// output rates.
    pub fn export_trace(&self, exported_at: impl Into<String>) -> TraceExport {
        TraceExport {
            exported_at: exported_at.into(),
            config: self.config.trace_config(),
            entries: self.trace.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoframe_model::{HandObservation, SourceSize};

    fn hand_frame(t: f64, min: f64, max: f64) -> DetectionFrame {
        DetectionFrame::single_hand(
            t,
            SourceSize::default(),
            HandObservation::from_pairs(&[(min, min), (max, max)]),
        )
    }

    fn ts(frame: u64) -> f64 {
        frame as f64 / 60.0
    }

    #[test]
    fn test_step_noop_while_idle() {
        let mut controller = FramingController::new(TrackingConfig::default()).unwrap();
        assert!(!controller.is_enabled());
        assert!(controller.step(&hand_frame(ts(1), 0.4, 0.6)).is_none());
        assert_eq!(controller.frame_count(), 0);
    }

    #[test]
    fn test_duplicate_timestamp_is_noop() {
        let mut controller = FramingController::enabled_with_defaults();
        let frame = hand_frame(ts(1), 0.4, 0.6);

        assert!(controller.step(&frame).is_some());
        let after_first = controller.transform();

        assert!(controller.step(&frame).is_none());
        assert_eq!(controller.frame_count(), 1);
        assert_eq!(controller.trace_len(), 1);
        assert_eq!(controller.transform(), after_first);
    }

    #[test]
    fn test_first_step_moves_toward_subject() {
        let mut controller = FramingController::enabled_with_defaults();
        // Subject in the upper-left quadrant.
        let output = controller.step(&hand_frame(ts(1), 0.1, 0.3)).unwrap();

        assert!(output.zoom > 1.0);
        // Pan is viewport-clamped but heads toward positive x/y.
        assert!(output.pan.x >= 0.0);
        assert!(output.pan.y >= 0.0);
    }

    #[test]
    fn test_enable_resets_pipeline_state() {
        let mut controller = FramingController::enabled_with_defaults();
        for frame in 1..=20 {
            controller.step(&hand_frame(ts(frame), 0.1, 0.3));
        }
        assert!(controller.frame_count() > 0);

        controller.set_enabled(false);
        assert_eq!(controller.trace_len(), 0);

        controller.set_enabled(true);
        assert_eq!(controller.frame_count(), 0);
        assert_eq!(controller.transform(), CameraTransform::IDENTITY);
        assert_eq!(controller.observable(), CameraTransform::IDENTITY);
    }

    #[test]
    fn test_preset_switch_resets_smoother_only() {
        let mut controller = FramingController::enabled_with_defaults();
        for frame in 1..=10 {
            controller.step(&hand_frame(ts(frame), 0.3, 0.7));
        }
        let frames_before = controller.frame_count();
        let trace_before = controller.trace_len();

        controller.set_preset(SmoothingPreset::KalmanFast).unwrap();

        assert_eq!(controller.frame_count(), frames_before);
        assert_eq!(controller.trace_len(), trace_before);
        assert!(controller.smoother_velocities().is_some());
    }

    #[test]
    fn test_observable_lags_internal_by_publish_interval() {
        let mut controller = FramingController::enabled_with_defaults();

        for frame in 1..=5 {
            controller.step(&hand_frame(ts(frame), 0.1, 0.3));
        }
        // Five frames processed, publish interval six: still identity.
        assert_eq!(controller.observable(), CameraTransform::IDENTITY);
        assert_ne!(controller.transform(), CameraTransform::IDENTITY);

        controller.step(&hand_frame(ts(6), 0.1, 0.3));
        assert_eq!(controller.observable(), controller.transform());
    }

    #[test]
    fn test_export_reflects_full_buffer_and_config() {
        let mut controller = FramingController::enabled_with_defaults();
        for frame in 1..=7 {
            controller.step(&hand_frame(ts(frame), 0.4, 0.6));
        }

        let export = controller.export_trace("2026-08-29T12:00:00Z");
        assert_eq!(export.entries.len(), 7);
        assert_eq!(export.config.padding, 2.0);
        assert_eq!(export.config.smoothing_preset, "exponential");
        assert_eq!(export.exported_at, "2026-08-29T12:00:00Z");
    }

    #[test]
    fn test_invalid_config_is_rejected_at_construction() {
        let config = TrackingConfig {
            smooth_factor: 0.0,
            ..TrackingConfig::default()
        };
        assert!(FramingController::new(config).is_err());
    }
}
