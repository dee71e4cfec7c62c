//! Error type shared by the transforms and the corner extractor.
//!
//! Empty inputs are not errors: an empty surface extracts to an empty list and
//! an empty tensor passes through every transform unchanged.

/// Failures reported by `salient-core`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not have the dimensionality the operation requires.
    #[error("expected a {expected}-dimensional surface, got {actual} dimension(s)")]
    InvalidShape { expected: usize, actual: usize },

    /// Every element has the same value, so `max - min` is zero.
    #[error("value range is degenerate: every element equals {value}")]
    DegenerateRange { value: f64 },

    /// The extraction threshold is NaN and would reject every cell.
    #[error("threshold must be a number, got NaN")]
    InvalidThreshold,

    /// Feature extents must be finite and strictly positive.
    #[error("feature extent must be positive, got {width}x{height}")]
    InvalidExtent { width: f32, height: f32 },

    /// `width * height` does not fit in `usize`.
    #[error("response map of {width}x{height} cells overflows")]
    SizeOverflow { width: usize, height: usize },

    /// A [`ResponseMap`](crate::ResponseMap) whose buffer does not match its
    /// declared size.
    #[error("response map layout: {0}")]
    Layout(#[from] ndarray::ShapeError),
}
