//! Measurement extraction: detections to a single framing target.

use autoframe_model::{BoundingBox, DetectionFrame, Measurement, PanOffset};

use crate::config::TrackingConfig;

/// Bounding box over every landmark of every non-empty hand in the frame.
///
/// Recorded in the trace alongside the derived measurement.
pub fn target_bounding_box(frame: &DetectionFrame) -> Option<BoundingBox> {
    BoundingBox::enclosing(&frame.hands)
}

/// Convert one frame's detections into a framing target, or `None` when no
/// subject is present.
///
/// Pure function: the target zoom frames the subject with `padding` margin
/// and the pan re-centers it. A degenerate bounding box (zero size, or a
/// non-finite derived zoom) falls back to `max_zoom` so nothing downstream
/// ever sees NaN or infinity.
pub fn extract_measurement(frame: &DetectionFrame, config: &TrackingConfig) -> Option<Measurement> {
    let bbox = target_bounding_box(frame)?;

    let (center_x, center_y) = bbox.center();
    let framed_size = bbox.size() * config.padding;

    let zoom = if framed_size > 0.0 && framed_size.is_finite() {
        let z = 1.0 / framed_size;
        if z.is_finite() {
            z.clamp(config.min_zoom, config.max_zoom)
        } else {
            config.max_zoom
        }
    } else {
        config.max_zoom
    };

    Some(Measurement::new(
        PanOffset::new(finite_or_zero(0.5 - center_x), finite_or_zero(0.5 - center_y)),
        zoom,
    ))
}

// Downstream stages assume finite values; a detector emitting NaN landmarks
// must not poison the pipeline.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
