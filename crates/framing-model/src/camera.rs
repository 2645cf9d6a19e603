//! Camera transform types and viewport-bound math.
//!
//! The camera model is a centered zoom plus a pan offset. Pan is expressed
//! in normalized units: the shift needed to re-center the subject, positive
//! meaning the view moves left/up. For a zoom `z` the visible window covers
//! `1/z` of the frame per axis, so the legal pan magnitude is
//! `(1 - 1/z) / 2` — zero at `z = 1`, growing monotonically with `z`.

use serde::{Deserialize, Serialize};

use crate::detection::SourceSize;

/// Zoom level meaning "no zoom": the full source frame is visible.
pub const MIN_ZOOM: f64 = 1.0;

/// Lower bound applied to zoom before any `1/zoom`, keeping the viewport
/// math total.
pub const ZOOM_EPSILON: f64 = 1e-6;

/// A pan offset in normalized units, roughly `[-0.5, 0.5]` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    /// No pan.
    pub const ZERO: PanOffset = PanOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another offset.
    pub fn distance_to(&self, other: &PanOffset) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Euclidean length of the offset.
    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }
}

/// A candidate pan/zoom target derived from one frame's detections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Pan offset from center.
    pub pan: PanOffset,
    /// Zoom level, `>= MIN_ZOOM`.
    pub zoom: f64,
}

impl Measurement {
    /// The rest target: centered, no zoom. Committed whenever no subject
    /// is detected.
    pub const REST: Measurement = Measurement {
        pan: PanOffset::ZERO,
        zoom: MIN_ZOOM,
    };

    pub fn new(pan: PanOffset, zoom: f64) -> Self {
        Self { pan, zoom }
    }
}

/// The smoothing filter's continuous estimate, before speed limiting and
/// viewport clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPosition {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl SmoothedPosition {
    /// The filter's reset state: centered, no zoom.
    pub const INITIAL: SmoothedPosition = SmoothedPosition {
        x: 0.0,
        y: 0.0,
        zoom: MIN_ZOOM,
    };

    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self { x, y, zoom }
    }

    /// The pan component of the estimate.
    pub fn pan(&self) -> PanOffset {
        PanOffset::new(self.x, self.y)
    }
}

/// Which viewport bounds the pan saturated against, at the current zoom.
///
/// Flags are inclusive at the exact boundary: a pan sitting precisely on
/// the limit reports the edge as clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClampedEdges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ClampedEdges {
    /// No edge saturated.
    pub const NONE: ClampedEdges = ClampedEdges {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// The authoritative per-frame framing result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    /// Zoom level, `>= MIN_ZOOM`.
    pub zoom: f64,
    /// Viewport-bounded pan offset.
    pub pan: PanOffset,
    /// Edges the pan saturated against.
    pub edges: ClampedEdges,
}

impl CameraTransform {
    /// The identity transform: full frame, centered.
    pub const IDENTITY: CameraTransform = CameraTransform {
        zoom: MIN_ZOOM,
        pan: PanOffset::ZERO,
        edges: ClampedEdges::NONE,
    };
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Maximum legal pan magnitude per axis for the given zoom.
///
/// `max_pan(1) == 0` (no panning without zoom) and the bound grows
/// monotonically toward `0.5` as zoom increases.
pub fn max_pan(zoom: f64) -> f64 {
    let z = zoom.max(ZOOM_EPSILON);
    ((1.0 - 1.0 / z) / 2.0).max(0.0)
}

/// Project a pan into the legal range for `zoom` and report which edges
/// saturated.
pub fn clamp_pan(pan: PanOffset, zoom: f64) -> (PanOffset, ClampedEdges) {
    let bound = max_pan(zoom);

    let edges = ClampedEdges {
        left: pan.x >= bound,
        right: pan.x <= -bound,
        top: pan.y >= bound,
        bottom: pan.y <= -bound,
    };

    let clamped = PanOffset {
        x: pan.x.clamp(-bound, bound),
        y: pan.y.clamp(-bound, bound),
    };

    (clamped, edges)
}

/// Pixel-space variant of [`clamp_pan`] for backward-compatible callers.
///
/// Takes and returns pan in source pixels. Not on the hot path; new code
/// should use the normalized form.
pub fn clamp_pan_px(
    pan_px: (f64, f64),
    zoom: f64,
    source: SourceSize,
) -> ((f64, f64), ClampedEdges) {
    let width = source.width.max(1) as f64;
    let height = source.height.max(1) as f64;

    let normalized = PanOffset::new(pan_px.0 / width, pan_px.1 / height);
    let (clamped, edges) = clamp_pan(normalized, zoom);

    ((clamped.x * width, clamped.y * height), edges)
}
