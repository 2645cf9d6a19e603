//! Autoframe Framing Core — The Camera Director
//!
//! Turns per-frame hand detections into a stable pan/zoom camera transform:
//! - **Measurement:** Aggregate detections into a single framing target
//! - **Hysteresis:** Deadband gating against detection noise
//! - **Smoothing:** Exponential and Kalman-style filter strategies
//! - **Speed limiting + viewport clamping:** No jumps, no out-of-frame pans
//! - **Controller:** The per-frame loop with dual-rate outputs and a trace
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! The host owns the frame clock and calls [`FramingController::step`]
//! once per displayable frame.

pub mod config;
pub mod controller;
pub mod gate;
pub mod limiter;
pub mod measure;
pub mod smoothing;

pub use config::TrackingConfig;
pub use controller::FramingController;
pub use smoothing::{Smoother, SmoothingPreset};
