//! Smoothing strategies for the committed framing target.
//!
//! Two strategies share one interface:
//! - **Exponential:** per-axis `state += (target - state) * factor`.
//! - **Kalman:** three independent 1-D constant-velocity filters (x, y,
//!   zoom), each correcting with the scalar position measurement only.
//!
//! Strategies are selected by [`SmoothingPreset`]; unknown presets are
//! rejected at construction, never silently defaulted.

use serde::{Deserialize, Serialize};

use autoframe_common::{AutoframeError, AutoframeResult};
use autoframe_model::{Measurement, SmoothedPosition, MIN_ZOOM};

/// User-selectable smoothing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SmoothingPreset {
    /// Exponential per-axis smoothing with the configured factor.
    #[default]
    #[serde(rename = "exponential")]
    Exponential,

    /// Constant-velocity Kalman, tuned responsive (more jitter-tolerant).
    #[serde(rename = "kalmanFast")]
    KalmanFast,

    /// Constant-velocity Kalman, tuned steady (slower, smoother).
    #[serde(rename = "kalmanSmooth")]
    KalmanSmooth,
}

impl SmoothingPreset {
    /// The wire/config tag for this preset.
    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothingPreset::Exponential => "exponential",
            SmoothingPreset::KalmanFast => "kalmanFast",
            SmoothingPreset::KalmanSmooth => "kalmanSmooth",
        }
    }
}

impl std::str::FromStr for SmoothingPreset {
    type Err = AutoframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exponential" => Ok(SmoothingPreset::Exponential),
            "kalmanFast" => Ok(SmoothingPreset::KalmanFast),
            "kalmanSmooth" => Ok(SmoothingPreset::KalmanSmooth),
            other => Err(AutoframeError::config(format!(
                "unknown smoothing preset: {other:?} (expected exponential, kalmanFast, or kalmanSmooth)"
            ))),
        }
    }
}

/// A configured smoothing strategy.
#[derive(Debug, Clone)]
pub enum Smoother {
    Exponential(ExponentialSmoother),
    Kalman(KalmanSmoother),
}

impl Smoother {
    /// Build a smoother for the preset.
    ///
    /// `smooth_factor` applies to the exponential strategy and must lie in
    /// `(0, 1]`.
    pub fn from_preset(preset: SmoothingPreset, smooth_factor: f64) -> AutoframeResult<Self> {
        match preset {
            SmoothingPreset::Exponential => {
                if !(smooth_factor > 0.0 && smooth_factor <= 1.0) {
                    return Err(AutoframeError::config(format!(
                        "smooth_factor must be in (0, 1], got {smooth_factor}"
                    )));
                }
                Ok(Smoother::Exponential(ExponentialSmoother::new(
                    smooth_factor,
                )))
            }
            SmoothingPreset::KalmanFast => {
                Ok(Smoother::Kalman(KalmanSmoother::new(KalmanParams::FAST)))
            }
            SmoothingPreset::KalmanSmooth => {
                Ok(Smoother::Kalman(KalmanSmoother::new(KalmanParams::SMOOTH)))
            }
        }
    }

    /// Advance the filter toward `target` and return the new estimate.
    pub fn update(&mut self, target: &Measurement) -> SmoothedPosition {
        match self {
            Smoother::Exponential(s) => s.update(target),
            Smoother::Kalman(s) => s.update(target),
        }
    }

    /// Current estimate without mutation.
    pub fn position(&self) -> SmoothedPosition {
        match self {
            Smoother::Exponential(s) => s.position(),
            Smoother::Kalman(s) => s.position(),
        }
    }

    /// Reinitialize to the rest state `{x: 0, y: 0, zoom: 1}`.
    pub fn reset(&mut self) {
        match self {
            Smoother::Exponential(s) => s.reset(),
            Smoother::Kalman(s) => s.reset(),
        }
    }

    /// Per-axis velocity estimates `[vx, vy, vzoom]`, available for the
    /// Kalman strategy only.
    pub fn velocities(&self) -> Option<[f64; 3]> {
        match self {
            Smoother::Exponential(_) => None,
            Smoother::Kalman(s) => Some(s.velocities()),
        }
    }
}

/// Per-axis exponential smoothing.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    state: SmoothedPosition,
    factor: f64,
}

impl ExponentialSmoother {
    /// Create with the given factor.
    ///
    /// The filter itself is total over any factor; range validation happens
    /// in [`Smoother::from_preset`].
    pub fn new(factor: f64) -> Self {
        Self {
            state: SmoothedPosition::INITIAL,
            factor,
        }
    }

    pub fn update(&mut self, target: &Measurement) -> SmoothedPosition {
        if self.factor >= 1.0 {
            // Snap exactly; the incremental form can leave float residue.
            self.state = SmoothedPosition::new(target.pan.x, target.pan.y, target.zoom);
            return self.state;
        }

        self.state.x += (target.pan.x - self.state.x) * self.factor;
        self.state.y += (target.pan.y - self.state.y) * self.factor;
        self.state.zoom += (target.zoom - self.state.zoom) * self.factor;
        self.state
    }

    pub fn position(&self) -> SmoothedPosition {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = SmoothedPosition::INITIAL;
    }
}

/// Process/measurement noise tuning for one Kalman preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanParams {
    /// Process noise added to the position variance per step.
    pub q_pos: f64,
    /// Process noise added to the velocity variance per step.
    pub q_vel: f64,
    /// Measurement noise variance.
    pub r: f64,
}

impl KalmanParams {
    /// Responsive tuning: high process noise, trusts measurements quickly.
    pub const FAST: KalmanParams = KalmanParams {
        q_pos: 2e-2,
        q_vel: 2e-3,
        r: 5e-3,
    };

    /// Steady tuning: low process noise, heavier smoothing.
    pub const SMOOTH: KalmanParams = KalmanParams {
        q_pos: 5e-4,
        q_vel: 5e-5,
        r: 2e-2,
    };
}

/// One 1-D constant-velocity filter: state `[position, velocity]` with a
/// 2x2 covariance. Only position is observed.
#[derive(Debug, Clone)]
struct AxisFilter {
    pos: f64,
    vel: f64,
    // Covariance rows: [[p00, p01], [p10, p11]].
    p: [[f64; 2]; 2],
    params: KalmanParams,
    initial_pos: f64,
}

impl AxisFilter {
    fn new(initial_pos: f64, params: KalmanParams) -> Self {
        Self {
            pos: initial_pos,
            vel: 0.0,
            p: Self::initial_covariance(params),
            params,
            initial_pos,
        }
    }

    fn initial_covariance(params: KalmanParams) -> [[f64; 2]; 2] {
        // Start at the process-noise floor so the first corrections ramp
        // with the preset's responsiveness instead of snapping.
        [[params.q_pos, 0.0], [0.0, params.q_vel]]
    }

    fn reset(&mut self) {
        self.pos = self.initial_pos;
        self.vel = 0.0;
        self.p = Self::initial_covariance(self.params);
    }

    /// Predict with unit timestep, then correct with the measurement `z`.
    fn step(&mut self, z: f64) {
        // Predict: pos' = pos + vel, vel' = vel.
        self.pos += self.vel;
        let [[p00, p01], [p10, p11]] = self.p;
        let q00 = p00 + p10 + p01 + p11 + self.params.q_pos;
        let q01 = p01 + p11;
        let q10 = p10 + p11;
        let q11 = p11 + self.params.q_vel;

        // Correct with H = [1, 0].
        let s = q00 + self.params.r;
        let k0 = q00 / s;
        let k1 = q10 / s;

        let innovation = z - self.pos;
        self.pos += k0 * innovation;
        self.vel += k1 * innovation;

        self.p = [
            [(1.0 - k0) * q00, (1.0 - k0) * q01],
            [q10 - k1 * q00, q11 - k1 * q01],
        ];
    }
}

/// Three independent constant-velocity filters, one per axis.
#[derive(Debug, Clone)]
pub struct KalmanSmoother {
    x: AxisFilter,
    y: AxisFilter,
    zoom: AxisFilter,
}

impl KalmanSmoother {
    pub fn new(params: KalmanParams) -> Self {
        Self {
            x: AxisFilter::new(0.0, params),
            y: AxisFilter::new(0.0, params),
            zoom: AxisFilter::new(MIN_ZOOM, params),
        }
    }

    pub fn update(&mut self, target: &Measurement) -> SmoothedPosition {
        self.x.step(target.pan.x);
        self.y.step(target.pan.y);
        self.zoom.step(target.zoom);
        self.position()
    }

    pub fn position(&self) -> SmoothedPosition {
        SmoothedPosition::new(self.x.pos, self.y.pos, self.zoom.pos)
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.zoom.reset();
    }

    /// Per-axis velocity estimates `[vx, vy, vzoom]` for diagnostics.
    pub fn velocities(&self) -> [f64; 3] {
        [self.x.vel, self.y.vel, self.zoom.vel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoframe_model::PanOffset;

    fn target(x: f64, y: f64, zoom: f64) -> Measurement {
        Measurement::new(PanOffset::new(x, y), zoom)
    }

    fn distance(a: SmoothedPosition, m: &Measurement) -> f64 {
        (a.x - m.pan.x)
            .abs()
            .max((a.y - m.pan.y).abs())
            .max((a.zoom - m.zoom).abs())
    }

    #[test]
    fn test_exponential_half_step() {
        let mut smoother = ExponentialSmoother::new(0.5);
        let out = smoother.update(&target(1.0, 1.0, 2.0));
        assert_eq!(out, SmoothedPosition::new(0.5, 0.5, 1.5));
    }

    #[test]
    fn test_exponential_factor_one_snaps_in_one_step() {
        let mut smoother = ExponentialSmoother::new(1.0);
        let t = target(0.3, -0.2, 3.1);
        let out = smoother.update(&t);
        assert_eq!(out.x, 0.3);
        assert_eq!(out.y, -0.2);
        assert_eq!(out.zoom, 3.1);
    }

    #[test]
    fn test_exponential_factor_zero_never_moves() {
        let mut smoother = ExponentialSmoother::new(0.0);
        for _ in 0..50 {
            smoother.update(&target(1.0, -1.0, 4.0));
        }
        assert_eq!(smoother.position(), SmoothedPosition::INITIAL);
    }

    #[test]
    fn test_exponential_converges() {
        let mut smoother = ExponentialSmoother::new(0.1);
        let t = target(0.4, -0.3, 2.5);
        for _ in 0..100 {
            smoother.update(&t);
        }
        assert!(distance(smoother.position(), &t) < 0.01);
    }

    #[test]
    fn test_exponential_position_does_not_mutate() {
        let mut smoother = ExponentialSmoother::new(0.5);
        smoother.update(&target(1.0, 1.0, 2.0));
        let a = smoother.position();
        let b = smoother.position();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exponential_reset() {
        let mut smoother = ExponentialSmoother::new(0.5);
        smoother.update(&target(1.0, 1.0, 2.0));
        smoother.reset();
        assert_eq!(smoother.position(), SmoothedPosition::INITIAL);
    }

    #[test]
    fn test_kalman_converges_both_presets() {
        for params in [KalmanParams::FAST, KalmanParams::SMOOTH] {
            let mut smoother = KalmanSmoother::new(params);
            let t = target(0.4, -0.3, 2.5);
            for _ in 0..200 {
                smoother.update(&t);
            }
            assert!(
                distance(smoother.position(), &t) < 0.1,
                "preset {params:?} did not converge: {:?}",
                smoother.position()
            );
        }
    }

    #[test]
    fn test_kalman_fast_outpaces_smooth() {
        let t = target(0.4, 0.0, 1.0);
        let mut fast = KalmanSmoother::new(KalmanParams::FAST);
        let mut smooth = KalmanSmoother::new(KalmanParams::SMOOTH);

        for _ in 0..10 {
            fast.update(&t);
            smooth.update(&t);
        }

        let fast_err = (fast.position().x - t.pan.x).abs();
        let smooth_err = (smooth.position().x - t.pan.x).abs();
        assert!(
            fast_err < smooth_err,
            "fast err {fast_err} should be below smooth err {smooth_err}"
        );
    }

    #[test]
    fn test_kalman_velocity_settles_on_constant_target() {
        let mut smoother = KalmanSmoother::new(KalmanParams::FAST);
        let t = target(0.2, 0.0, 2.0);
        for _ in 0..200 {
            smoother.update(&t);
        }
        let [vx, vy, vzoom] = smoother.velocities();
        assert!(vx.abs() < 0.01);
        assert!(vy.abs() < 0.01);
        assert!(vzoom.abs() < 0.01);
    }

    #[test]
    fn test_kalman_reset_restores_rest_state() {
        let mut smoother = KalmanSmoother::new(KalmanParams::SMOOTH);
        smoother.update(&target(0.4, 0.4, 3.0));
        smoother.reset();
        assert_eq!(smoother.position(), SmoothedPosition::INITIAL);
        assert_eq!(smoother.velocities(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_preset_construction_validates_factor() {
        assert!(Smoother::from_preset(SmoothingPreset::Exponential, 0.0).is_err());
        assert!(Smoother::from_preset(SmoothingPreset::Exponential, 1.5).is_err());
        assert!(Smoother::from_preset(SmoothingPreset::Exponential, f64::NAN).is_err());
        assert!(Smoother::from_preset(SmoothingPreset::Exponential, 0.05).is_ok());
        // Kalman presets ignore the factor.
        assert!(Smoother::from_preset(SmoothingPreset::KalmanFast, 0.0).is_ok());
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!(
            "kalmanFast".parse::<SmoothingPreset>().unwrap(),
            SmoothingPreset::KalmanFast
        );
        assert!("butterworth".parse::<SmoothingPreset>().is_err());
    }

    #[test]
    fn test_velocities_exposed_only_for_kalman() {
        let exp = Smoother::from_preset(SmoothingPreset::Exponential, 0.1).unwrap();
        assert!(exp.velocities().is_none());

        let kalman = Smoother::from_preset(SmoothingPreset::KalmanSmooth, 0.1).unwrap();
        assert!(kalman.velocities().is_some());
    }
}
