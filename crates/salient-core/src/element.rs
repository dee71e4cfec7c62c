//! Numeric element kinds accepted by the transforms and the extractor.

use core::fmt::Debug;
use num_traits::{Bounded, Float, Num};

/// A scalar that can live in a tensor handled by this crate.
///
/// Every kind names a floating `Real` type used for the arithmetic that does
/// not fit the element type itself (division for integers, square roots,
/// accumulations that would overflow `u8`). Floats are their own `Real`;
/// integers use `f64`.
pub trait Element: Copy + PartialOrd + Num + Bounded + Debug + Send + Sync + 'static {
    /// Floating type used for extended-precision arithmetic.
    type Real: Float + Debug + Send + Sync + 'static;

    /// Seed of the infinity-norm reduction.
    ///
    /// Integers use their minimum representable value. Floats use the smallest
    /// positive normal value, so the norm of an all-negative or all-subnormal
    /// float tensor is this seed rather than its true maximum.
    fn max_seed() -> Self;

    /// Widen to the real type.
    fn to_real(self) -> Self::Real;

    /// Narrow from the real type.
    ///
    /// Integers use Rust's saturating float-to-int conversion: the fraction is
    /// truncated, NaN becomes zero and out-of-range values clamp to the type
    /// bounds.
    fn from_real(r: Self::Real) -> Self;

    /// Whether the value is unordered (NaN). Always `false` for integers.
    #[inline]
    fn is_nan(self) -> bool {
        false
    }
}

macro_rules! float_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            type Real = $t;

            #[inline]
            fn max_seed() -> Self {
                <$t>::MIN_POSITIVE
            }

            #[inline]
            fn to_real(self) -> $t {
                self
            }

            #[inline]
            fn from_real(r: $t) -> Self {
                r
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
        }
    )*};
}

macro_rules! int_element {
    ($($t:ty),*) => {$(
        impl Element for $t {
            type Real = f64;

            #[inline]
            fn max_seed() -> Self {
                <$t>::MIN
            }

            #[inline]
            fn to_real(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_real(r: f64) -> Self {
                r as $t
            }
        }
    )*};
}

float_element!(f32, f64);
int_element!(i8, i16, i32, i64, u8, u16, u32, u64);
