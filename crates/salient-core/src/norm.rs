//! Norms and in-place rescaling of tensors.
//!
//! Every transform takes an exclusive borrow of the caller's array, mutates it
//! element by element and hands the same borrow back, so calls chain without
//! copying:
//!
//! ```
//! use ndarray::array;
//! use salient_core::norm::{NormKind, TensorNorm, TensorTransforms};
//!
//! let mut t = array![[3.0f32, 4.0], [0.0, 0.0]];
//! let n = t.normalized(NormKind::L2).norm(NormKind::L2);
//! assert!((n - 1.0).abs() < 1e-6);
//! ```
//!
//! Reductions visit elements in logical (row-major) order regardless of the
//! memory layout, which matters for the order-dependent L1 fold.

use crate::element::Element;
use crate::error::Error;
use core::str::FromStr;
use ndarray::{ArrayBase, Data, DataMut, Dimension};
use num_traits::{Float, One, ToPrimitive, Zero};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Which norm to compute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum NormKind {
    /// Largest element, seeded with [`Element::max_seed`].
    Infinity,
    /// Running fold `acc = |acc + x|` from zero.
    L1,
    /// Square root of the sum of squares.
    #[default]
    L2,
}

impl FromStr for NormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inf" | "infinity" | "max" => Ok(NormKind::Infinity),
            "l1" => Ok(NormKind::L1),
            "l2" => Ok(NormKind::L2),
            other => Err(format!(
                "invalid norm '{other}', expected infinity|l1|l2"
            )),
        }
    }
}

/// Compute the norm of `view`.
///
/// The result is reported in the element's real type for every kind. An empty
/// tensor yields the reduction seed: zero for L1/L2 and
/// [`Element::max_seed`] for the infinity norm.
///
/// For 64-bit integers the infinity norm is rounded to the nearest `f64`, so
/// magnitudes above 2^53 are not exact. [`max_element`] returns the same
/// maximum in the element type.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(view), fields(len = view.len()))
)]
pub fn norm<T, S, D>(view: &ArrayBase<S, D>, kind: NormKind) -> T::Real
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    match kind {
        NormKind::Infinity => max_element(view).to_real(),
        NormKind::L1 => view
            .iter()
            .fold(T::Real::zero(), |acc, &x| (acc + x.to_real()).abs()),
        NormKind::L2 => view
            .iter()
            .fold(T::Real::zero(), |acc, &x| {
                let r = x.to_real();
                acc + r * r
            })
            .sqrt(),
    }
}

/// Conventional L1 norm, `Σ|x|`.
///
/// [`NormKind::L1`] keeps the running fold `|acc + x|`, which differs from this
/// as soon as the data mixes signs.
pub fn l1_abs_sum<T, S, D>(view: &ArrayBase<S, D>) -> T::Real
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    view.iter()
        .fold(T::Real::zero(), |acc, &x| acc + x.to_real().abs())
}

/// Largest element, starting from [`Element::max_seed`].
pub fn max_element<T, S, D>(view: &ArrayBase<S, D>) -> T
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    view.iter()
        .fold(T::max_seed(), |m, &x| if x > m { x } else { m })
}

/// Smallest and largest element, or `None` when the tensor holds no ordered
/// value.
///
/// NaNs are skipped, so an empty or all-NaN tensor yields `None`. Otherwise the
/// pair is taken from the data itself and `lo <= hi` always holds.
pub fn extrema<T, S, D>(view: &ArrayBase<S, D>) -> Option<(T, T)>
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    view.iter()
        .filter(|&&x| !Element::is_nan(x))
        .fold(None, |acc, &x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((if x < lo { x } else { lo }, if x > hi { x } else { hi })),
        })
}

/// Divide every element by the tensor's norm, in place.
///
/// Integers are divided in `f64` and narrowed back (truncating). A zero norm
/// is not reported: floats turn into inf/NaN and integers saturate.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(view), fields(len = view.len()))
)]
pub fn normalized<T, S, D>(view: &mut ArrayBase<S, D>, kind: NormKind) -> &mut ArrayBase<S, D>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    let n = norm(&*view, kind);
    view.map_inplace(|x| *x = T::from_real(x.to_real() / n));
    view
}

/// Affine map `x = alpha * x + beta`, in place.
pub fn scaled<T, S, D>(
    view: &mut ArrayBase<S, D>,
    alpha: T::Real,
    beta: T::Real,
) -> &mut ArrayBase<S, D>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    view.map_inplace(|x| *x = T::from_real(alpha * x.to_real() + beta));
    view
}

/// Remap `[min(view), max(view)]` onto `[min_value, max_value]`, in place.
///
/// A constant tensor divides by zero: for floats every element becomes NaN.
/// Use [`try_ranged`] to have that case reported instead. NaNs do not take
/// part in the extrema and stay NaN; an all-NaN tensor is left as is.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(view), fields(len = view.len()))
)]
pub fn ranged<T, S, D>(
    view: &mut ArrayBase<S, D>,
    min_value: T::Real,
    max_value: T::Real,
) -> &mut ArrayBase<S, D>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    let Some((lo, hi)) = extrema(&*view) else {
        return view;
    };
    remap(view, lo, hi, min_value, max_value)
}

/// [`ranged`] onto the unit interval.
pub fn unit_ranged<T, S, D>(view: &mut ArrayBase<S, D>) -> &mut ArrayBase<S, D>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    ranged(view, T::Real::zero(), T::Real::one())
}

/// Like [`ranged`], but leaves the tensor untouched and returns
/// [`Error::DegenerateRange`] when every element is equal or NaN.
///
/// An empty tensor is returned unchanged.
pub fn try_ranged<T, S, D>(
    view: &mut ArrayBase<S, D>,
    min_value: T::Real,
    max_value: T::Real,
) -> Result<&mut ArrayBase<S, D>, Error>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    if view.is_empty() {
        return Ok(view);
    }
    let Some((lo, hi)) = extrema(&*view) else {
        return Err(Error::DegenerateRange { value: f64::NAN });
    };
    if lo == hi {
        return Err(Error::DegenerateRange {
            value: lo.to_real().to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(remap(view, lo, hi, min_value, max_value))
}

fn remap<T, S, D>(
    view: &mut ArrayBase<S, D>,
    lo: T,
    hi: T,
    min_value: T::Real,
    max_value: T::Real,
) -> &mut ArrayBase<S, D>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    let lo = lo.to_real();
    let span = hi.to_real() - lo;
    let target = max_value - min_value;
    view.map_inplace(|x| *x = T::from_real(target * ((x.to_real() - lo) / span) + min_value));
    view
}

/// Method form of [`norm`] on any `ndarray` array or view, read-only views
/// included.
pub trait TensorNorm<T: Element> {
    /// See [`norm`].
    fn norm(&self, kind: NormKind) -> T::Real;
}

impl<T, S, D> TensorNorm<T> for ArrayBase<S, D>
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    fn norm(&self, kind: NormKind) -> T::Real {
        norm(self, kind)
    }
}

/// Method form of the transforms on any `ndarray` array or mutable view.
///
/// The mutating methods return `&mut Self`, the same storage the call was made
/// on.
pub trait TensorTransforms<T: Element>: TensorNorm<T> {
    /// See [`normalized`].
    fn normalized(&mut self, kind: NormKind) -> &mut Self;
    /// See [`scaled`].
    fn scaled(&mut self, alpha: T::Real, beta: T::Real) -> &mut Self;
    /// See [`ranged`].
    fn ranged(&mut self, min_value: T::Real, max_value: T::Real) -> &mut Self;
}

impl<T, S, D> TensorTransforms<T> for ArrayBase<S, D>
where
    T: Element,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    fn normalized(&mut self, kind: NormKind) -> &mut Self {
        normalized(self, kind)
    }

    fn scaled(&mut self, alpha: T::Real, beta: T::Real) -> &mut Self {
        scaled(self, alpha, beta)
    }

    fn ranged(&mut self, min_value: T::Real, max_value: T::Real) -> &mut Self {
        ranged(self, min_value, max_value)
    }
}
