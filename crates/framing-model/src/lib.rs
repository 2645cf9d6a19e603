//! Autoframe Data Model
//!
//! Defines the core data contracts for the framing pipeline:
//! - **Detections:** Per-frame hand observations from the external detector
//! - **Camera:** Pan/zoom measurements, transforms, and viewport bounds
//! - **Trace:** Bounded per-frame diagnostic records and export snapshots
//!
//! All coordinates are normalized to `[0.0, 1.0]` range relative to the
//! source frame so values survive resolution changes across sessions.

pub mod camera;
pub mod detection;
pub mod trace;

pub use camera::*;
pub use detection::*;
pub use trace::*;
