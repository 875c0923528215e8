//! Hard-coded constants.

/// Float-rounding tolerance for the ball-containment invariant.
pub const EPSILON: f64 = 1e-8;
