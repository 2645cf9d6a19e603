//! Pipeline tuning configuration.

use serde::{Deserialize, Serialize};

use autoframe_common::{AutoframeError, AutoframeResult};
use autoframe_model::{TraceConfig, DEFAULT_TRACE_CAPACITY, MIN_ZOOM};

use crate::smoothing::SmoothingPreset;

/// Tunable parameters of the framing pipeline.
///
/// All thresholds and speeds are in normalized units per frame, independent
/// of the source resolution. Values are validated by [`TrackingConfig::validate`];
/// out-of-range configuration fails loudly instead of being silently
/// corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Whether the controller starts in the active state.
    pub enabled: bool,

    /// Margin multiplier around the subject's bounding box. Larger padding
    /// means more headroom and a lower zoom for the same subject size.
    pub padding: f64,

    /// Lower zoom bound; 1.0 shows the full frame.
    pub min_zoom: f64,

    /// Upper zoom bound.
    pub max_zoom: f64,

    /// Hysteresis deadband for zoom changes.
    pub zoom_threshold: f64,

    /// Hysteresis deadband for pan changes (Euclidean distance).
    pub pan_threshold: f64,

    /// Maximum pan change per frame (Euclidean magnitude).
    pub max_pan_speed: f64,

    /// Maximum zoom change per frame.
    pub max_zoom_speed: f64,

    /// Smoothing strategy.
    pub preset: SmoothingPreset,

    /// Factor for the exponential strategy, in `(0, 1]`.
    pub smooth_factor: f64,

    /// The observable snapshot is refreshed every this many frames.
    pub publish_interval: u32,

    /// Trace ring-buffer capacity in frames.
    pub trace_capacity: usize,

    /// Consecutive subject-less frames required before the committed
    /// target snaps to rest. 0 means immediately on the first loss.
    pub loss_debounce_frames: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            padding: 2.0,
            min_zoom: MIN_ZOOM,
            max_zoom: 4.0,
            zoom_threshold: 0.15,
            pan_threshold: 0.05,
            max_pan_speed: 0.02,
            max_zoom_speed: 0.08,
            preset: SmoothingPreset::Exponential,
            smooth_factor: 0.05,
            publish_interval: 6,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
            loss_debounce_frames: 0,
        }
    }
}

impl TrackingConfig {
    /// Check every parameter, returning the first violation.
    pub fn validate(&self) -> AutoframeResult<()> {
        if !(self.padding.is_finite() && self.padding > 0.0) {
            return Err(AutoframeError::config(format!(
                "padding must be positive, got {}",
                self.padding
            )));
        }
        if !(self.min_zoom.is_finite() && self.min_zoom >= MIN_ZOOM) {
            return Err(AutoframeError::config(format!(
                "min_zoom must be >= {MIN_ZOOM}, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(AutoframeError::config(format!(
                "max_zoom must be >= min_zoom ({}), got {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_threshold.is_finite() && self.zoom_threshold >= 0.0) {
            return Err(AutoframeError::config(format!(
                "zoom_threshold must be non-negative, got {}",
                self.zoom_threshold
            )));
        }
        if !(self.pan_threshold.is_finite() && self.pan_threshold >= 0.0) {
            return Err(AutoframeError::config(format!(
                "pan_threshold must be non-negative, got {}",
                self.pan_threshold
            )));
        }
        if !(self.max_pan_speed.is_finite() && self.max_pan_speed > 0.0) {
            return Err(AutoframeError::config(format!(
                "max_pan_speed must be positive, got {}",
                self.max_pan_speed
            )));
        }
        if !(self.max_zoom_speed.is_finite() && self.max_zoom_speed > 0.0) {
            return Err(AutoframeError::config(format!(
                "max_zoom_speed must be positive, got {}",
                self.max_zoom_speed
            )));
        }
        if self.preset == SmoothingPreset::Exponential
            && !(self.smooth_factor > 0.0 && self.smooth_factor <= 1.0)
        {
            return Err(AutoframeError::config(format!(
                "smooth_factor must be in (0, 1], got {}",
                self.smooth_factor
            )));
        }
        if self.publish_interval == 0 {
            return Err(AutoframeError::config(
                "publish_interval must be at least 1",
            ));
        }
        if self.trace_capacity == 0 {
            return Err(AutoframeError::config("trace_capacity must be at least 1"));
        }
        Ok(())
    }

    /// The configuration subset recorded in trace exports.
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig {
            padding: self.padding,
            smoothing_preset: self.preset.as_str().to_string(),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            zoom_threshold: self.zoom_threshold,
            pan_threshold: self.pan_threshold,
        }
    }
}
