//! Replay a detection log through the framing controller.

use std::path::PathBuf;

use autoframe_common::clock::SessionClock;
use autoframe_common::config::SessionDefaults;
use autoframe_common::error::AutoframeError;
use autoframe_core::{FramingController, SmoothingPreset, TrackingConfig};
use autoframe_model::parse_detections;

#[allow(clippy::too_many_arguments)]
pub fn run(
    path: PathBuf,
    padding: f64,
    preset: String,
    smooth_factor: f64,
    max_zoom: f64,
    publish_interval: u32,
    loss_debounce: u32,
    export_trace: Option<PathBuf>,
    session: &SessionDefaults,
) -> anyhow::Result<()> {
    println!("Tracking detection log: {}", path.display());

    let content = std::fs::read_to_string(&path)
        .map_err(|_| AutoframeError::FileNotFound { path: path.clone() })?;
    let frames = parse_detections(&content)
        .map_err(|e| AutoframeError::detection(format!("failed to parse log: {e}")))?;

    println!("  Loaded {} frames", frames.len());
    if frames.is_empty() {
        println!("  Nothing to track.");
        return Ok(());
    }

    let preset: SmoothingPreset = preset.parse()?;
    let config = TrackingConfig {
        enabled: true,
        padding,
        preset,
        smooth_factor,
        max_zoom,
        publish_interval,
        loss_debounce_frames: loss_debounce,
        trace_capacity: session.trace_capacity,
        ..TrackingConfig::default()
    };
    let mut controller = FramingController::new(config)?;

    let mut processed = 0u64;
    let mut clamped_frames = 0u64;
    let mut peak_zoom: f64 = 1.0;

    for frame in &frames {
        if controller.step(frame).is_none() {
            tracing::debug!(t = frame.timestamp_secs, "skipped stale frame");
            continue;
        }

        processed += 1;
        let output = controller.transform();
        peak_zoom = peak_zoom.max(output.zoom);
        if output.edges.any() {
            clamped_frames += 1;
        }
    }

    let last = controller.transform();
    println!("  Processed {processed} frames ({} stale)", frames.len() as u64 - processed);
    println!("  Peak zoom: {peak_zoom:.3}");
    println!("  Frames with saturated pan: {clamped_frames}");
    println!(
        "  Final transform: zoom {:.3}, pan ({:+.4}, {:+.4})",
        last.zoom, last.pan.x, last.pan.y
    );
    if let Some([vx, vy, vzoom]) = controller.smoother_velocities() {
        println!("  Smoother velocities: ({vx:+.5}, {vy:+.5}, {vzoom:+.5})");
    }

    if let Some(out_path) = export_trace {
        let export = controller.export_trace(SessionClock::now_wall());
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(&out_path, json).map_err(|e| {
            AutoframeError::export(format!("cannot write {}: {e}", out_path.display()))
        })?;
        println!(
            "  Trace written to: {} ({} entries)",
            out_path.display(),
            export.entries.len()
        );
    }

    println!("\nTracking complete.");
    Ok(())
}
