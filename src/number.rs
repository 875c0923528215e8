//! Scalar bound for the index: the floating-point type that coordinates and
//! distances are computed in.

use num_traits::{Float, FromPrimitive, NumCast};

/// A floating-point scalar usable as a coordinate or distance value.
pub trait Number:
    Float + FromPrimitive + NumCast + std::iter::Sum + Send + Sync + std::fmt::Debug + 'static
{
    /// Casts to `f64`.
    fn as_f64(self) -> f64 {
        NumCast::from(self).unwrap_or(0.0)
    }
}

impl Number for f32 {}
impl Number for f64 {}
