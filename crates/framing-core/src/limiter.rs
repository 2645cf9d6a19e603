//! Per-frame speed limiting of the smoothed camera motion.
//!
//! The smoother can step arbitrarily far in one frame (a fresh committed
//! target, a snap preset); the limiter caps the visible motion so the
//! camera never lurches. Pan is limited by Euclidean magnitude with
//! direction preserved; zoom is limited per axis.

use autoframe_model::{CameraTransform, SmoothedPosition};

use crate::config::TrackingConfig;

/// Per-frame motion caps, in normalized units per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimit {
    pub max_pan_speed: f64,
    pub max_zoom_speed: f64,
}

impl SpeedLimit {
    pub fn from_config(config: &TrackingConfig) -> Self {
        Self {
            max_pan_speed: config.max_pan_speed,
            max_zoom_speed: config.max_zoom_speed,
        }
    }

    /// Half-rate limits, applied while no subject is tracked so the return
    /// to center stays gentle.
    pub fn halved(&self) -> Self {
        Self {
            max_pan_speed: self.max_pan_speed / 2.0,
            max_zoom_speed: self.max_zoom_speed / 2.0,
        }
    }
}

/// Cap the change from the previous output to the new smoothed estimate.
///
/// Total over its domain: a zero delta passes through untouched.
pub fn clamp_speed(
    previous: &CameraTransform,
    next: &SmoothedPosition,
    limit: &SpeedLimit,
    subject_present: bool,
) -> SmoothedPosition {
    let limit = if subject_present {
        *limit
    } else {
        limit.halved()
    };

    let dx = next.x - previous.pan.x;
    let dy = next.y - previous.pan.y;
    let pan_delta = (dx * dx + dy * dy).sqrt();

    let (x, y) = if pan_delta > limit.max_pan_speed {
        let scale = limit.max_pan_speed / pan_delta;
        (previous.pan.x + dx * scale, previous.pan.y + dy * scale)
    } else {
        (next.x, next.y)
    };

    let dzoom = next.zoom - previous.zoom;
    let zoom = if dzoom.abs() > limit.max_zoom_speed {
        previous.zoom + limit.max_zoom_speed.copysign(dzoom)
    } else {
        next.zoom
    };

    SmoothedPosition::new(x, y, zoom)
}
