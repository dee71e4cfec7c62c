//! Tensor norms, in-place rescaling and ranked corner extraction.
//!
//! # Overview
//!
//! This crate exposes two independent building blocks:
//!
//! - [`norm`] – infinity/L1/L2 norms and the in-place `normalized`, `scaled`
//!   and `ranged` transforms over any `ndarray` array or mutable view.
//! - [`extract`] – thresholding and global ranking of a dense 2-D response
//!   surface into `[row, column]` corner coordinates.
//!
//! The response itself (Harris, ChESS, ...) is computed elsewhere; the
//! extractor only consumes it. [`Feature`] is the record detectors build
//! around the extracted coordinates.
//!
//! Numeric kinds are described by [`Element`]: `f32`, `f64` and the signed and
//! unsigned integers from 8 to 64 bits.
//!
//! # Features
//!
//! - `rayon` – scans surface rows in parallel during extraction. The result is
//!   identical to the sequential scan.
//! - `tracing` – emits `tracing` spans for the public entry points.
//! - `serde` – derives `Serialize`/`Deserialize` for [`Feature`],
//!   [`NormKind`] and [`TiePolicy`].

pub mod element;
pub mod error;
pub mod extract;
pub mod feature;
pub mod norm;

use ndarray::{Array2, ArrayView2, ArrayViewMut2};

pub use crate::element::Element;
pub use crate::error::Error;
pub use crate::extract::{extract_corners, extract_scored, ExtractParams, ScoredCorner, TiePolicy};
pub use crate::feature::{features_from_scored, Feature};
pub use crate::norm::{
    norm, normalized, ranged, scaled, try_ranged, unit_ranged, NormKind, TensorNorm,
    TensorTransforms,
};

/// Dense response map in row-major layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<f32>,
}

impl ResponseMap {
    /// Zero-filled map of the given size.
    pub fn zeros(w: usize, h: usize) -> Result<Self, Error> {
        let len = w.checked_mul(h).ok_or(Error::SizeOverflow {
            width: w,
            height: h,
        })?;
        Ok(Self {
            w,
            h,
            data: vec![0.0; len],
        })
    }

    /// Copy an `(rows, cols)` array into a map, in logical order.
    pub fn from_array(a: &Array2<f32>) -> Self {
        let (h, w) = a.dim();
        Self {
            w,
            h,
            data: a.iter().copied().collect(),
        }
    }

    #[inline]
    /// Response value at an integer coordinate.
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }

    /// Borrow as an `(h, w)` view. Fails if `data` does not hold `w * h`
    /// values.
    pub fn view(&self) -> Result<ArrayView2<'_, f32>, Error> {
        Ok(ArrayView2::from_shape((self.h, self.w), self.data.as_slice())?)
    }

    /// Mutable `(h, w)` view for the in-place transforms.
    pub fn view_mut(&mut self) -> Result<ArrayViewMut2<'_, f32>, Error> {
        Ok(ArrayViewMut2::from_shape((self.h, self.w), self.data.as_mut_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn view_is_row_major() {
        let map = ResponseMap {
            w: 3,
            h: 2,
            data: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        };
        let v = map.view().unwrap();
        assert_eq!(v.dim(), (2, 3));
        assert_eq!(v[[1, 0]], 3.0);
        assert_eq!(map.at(2, 1), 5.0);
    }

    #[test]
    fn mismatched_buffer_is_a_layout_error() {
        let map = ResponseMap {
            w: 4,
            h: 4,
            data: vec![0.0; 3],
        };
        assert!(matches!(map.view(), Err(Error::Layout(_))));
    }

    #[test]
    fn zeros_rejects_overflowing_sizes() {
        assert!(matches!(
            ResponseMap::zeros(usize::MAX, 2),
            Err(Error::SizeOverflow { width: usize::MAX, height: 2 })
        ));
        assert_eq!(ResponseMap::zeros(3, 0).unwrap().data.len(), 0);
    }

    #[test]
    fn round_trips_through_an_array() {
        let a = array![[1.0f32, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let map = ResponseMap::from_array(&a);
        assert_eq!((map.w, map.h), (2, 3));
        assert_eq!(map.view().unwrap(), a);

        let t = ResponseMap::from_array(&a.t().to_owned());
        assert_eq!(t.data, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn view_mut_transforms_the_map_in_place() {
        let mut map = ResponseMap::zeros(2, 2).unwrap();
        map.data[3] = 4.0;
        map.view_mut().unwrap().scaled(0.5, 1.0);
        assert_eq!(map.data, vec![1.0, 1.0, 1.0, 3.0]);
    }
}
