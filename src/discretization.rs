//! Fixed-point conversion between meters and centimeter integers.
//!
//! The DP and knapsack operate entirely in centimeter integers; public
//! values stay in meters and are rounded to millimeter precision on
//! emission.

/// Size, in meters, of one discretization step.
pub const PRECISION: f64 = 0.01;

/// Tolerance, in meters, applied to every floating-point boundary
/// comparison (setback, gap, equality checks).
pub const TOLERANCE_M: f64 = 0.001;

/// Convert a meter measurement to a centimeter integer, rounding to the
/// nearest centimeter.
pub fn to_cm(meters: f64) -> i64 {
    (meters / PRECISION).round() as i64
}

/// Convert a centimeter integer back to meters.
pub fn to_m(cm: i64) -> f64 {
    cm as f64 * PRECISION
}

/// Round a meter value to millimeter precision, for emission on public
/// output records.
pub fn round_mm(meters: f64) -> f64 {
    (meters * 1000.0).round() / 1000.0
}
