/// Four control coefficients of a cubic Bernstein blend.
///
/// No monotonicity is enforced: coefficients outside `[0, 1]` overshoot or undershoot
/// on purpose, which is what produces the bounce in the reveal motion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CubicBezier(pub [f64; 4]);

impl CubicBezier {
    /// Evaluate the Bernstein blend at normalized time `tn`.
    ///
    /// Not clamped; extrapolates the polynomial outside `[0, 1]`.
    pub fn eval(self, tn: f64) -> f64 {
        let [p1, p2, p3, p4] = self.0;
        let u = 1.0 - tn;
        u * u * u * p1 + 3.0 * tn * u * u * p2 + 3.0 * tn * tn * u * p3 + tn * tn * tn * p4
    }
}

/// A time-warped easing curve: absolute time is normalized by `(t - offset) / scale`
/// before evaluating the [`CubicBezier`] blend.
///
/// Pure and stateless. The input is deliberately left unbounded — callers clamp the
/// tick or the output where monotonic `[0, 1]` progress is required.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    curve: CubicBezier,
    scale: f64,
    offset: f64,
}

impl Timeline {
    /// Build a timeline from a curve, a duration scale, and a time offset.
    pub fn new(curve: CubicBezier, scale: f64, offset: f64) -> Self {
        Self {
            curve,
            scale,
            offset,
        }
    }

    /// Sample the curve at absolute time `t`.
    pub fn sample(self, t: f64) -> f64 {
        self.curve.eval((t - self.offset) / self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
