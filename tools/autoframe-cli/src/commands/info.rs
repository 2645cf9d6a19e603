//! Show information about a detection log.

use std::path::PathBuf;

use autoframe_common::error::AutoframeError;
use autoframe_model::parse_detections;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|_| AutoframeError::FileNotFound { path: path.clone() })?;
    let frames = parse_detections(&content)
        .map_err(|e| AutoframeError::detection(format!("failed to parse log: {e}")))?;

    println!("Detection log: {}", path.display());
    println!("  Frames: {}", frames.len());

    if frames.is_empty() {
        return Ok(());
    }

    let with_subject = frames.iter().filter(|f| f.has_subject()).count();
    let max_hands = frames.iter().map(|f| f.hands.len()).max().unwrap_or(0);
    let total_points: usize = frames.iter().map(|f| f.point_count()).sum();
    let first = &frames[0];
    let duration = frames.last().unwrap_or(first).timestamp_secs - first.timestamp_secs;
    let source = first.source;

    println!("  Duration: {duration:.2}s");
    println!("  Source: {}x{}", source.width, source.height);
    println!(
        "  Frames with subject: {} ({:.1}%)",
        with_subject,
        100.0 * with_subject as f64 / frames.len() as f64
    );
    println!("  Max simultaneous hands: {max_hands}");
    println!("  Total landmarks: {total_points}");

    Ok(())
}
