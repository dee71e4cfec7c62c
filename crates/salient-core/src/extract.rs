//! Ranked corner extraction from a dense response surface.
//!
//! The extractor does no response computation and no spatial suppression: it
//! keeps every cell strictly above a threshold, orders them by descending
//! response and optionally keeps the strongest `count`.
use crate::element::Element;
use crate::error::Error;
use core::cmp::Ordering;
use core::num::NonZeroUsize;
use ndarray::{ArrayBase, ArrayView2, Data, Dimension, Ix2};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// How cells with exactly equal responses are ranked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TiePolicy {
    /// Keep every cell. Equal responses stay in row-major scan order.
    #[default]
    KeepAll,
    /// Keep only the last-scanned cell of each distinct response, as a map
    /// keyed by response value would.
    LastWins,
}

/// Parameters for [`extract_corners`].
#[derive(Clone, Debug)]
pub struct ExtractParams<T> {
    /// Maximum number of corners to return; `None` returns every match.
    pub count: Option<NonZeroUsize>,
    /// Cells must be strictly greater than this value.
    pub threshold: T,
    /// Ranking of equal responses.
    pub ties: TiePolicy,
}

impl<T: Element> Default for ExtractParams<T> {
    fn default() -> Self {
        Self {
            count: None,
            threshold: T::zero(),
            ties: TiePolicy::KeepAll,
        }
    }
}

impl<T: Element> ExtractParams<T> {
    /// Create a new parameter set with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `count` corners. Zero means no limit.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = NonZeroUsize::new(count);
        self
    }

    /// Set the exclusive response threshold.
    pub fn with_threshold(mut self, threshold: T) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the tie policy.
    pub fn with_ties(mut self, ties: TiePolicy) -> Self {
        self.ties = ties;
        self
    }
}

/// A surface cell that passed the threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredCorner<T> {
    /// `[row, column]` in the surface.
    pub rc: [usize; 2],
    /// Response at that cell.
    pub score: T,
}

/// Coordinates `[row, column]` of every cell above the threshold, strongest
/// first.
///
/// An empty surface yields an empty list. Inputs that are not 2-D fail with
/// [`Error::InvalidShape`]; a NaN threshold fails with
/// [`Error::InvalidThreshold`].
pub fn extract_corners<T, S, D>(
    surface: &ArrayBase<S, D>,
    params: &ExtractParams<T>,
) -> Result<Vec<[usize; 2]>, Error>
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    Ok(extract_scored(surface, params)?
        .into_iter()
        .map(|c| c.rc)
        .collect())
}

/// Same as [`extract_corners`], keeping the response of each corner.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(surface, params), fields(shape = ?surface.shape()))
)]
pub fn extract_scored<T, S, D>(
    surface: &ArrayBase<S, D>,
    params: &ExtractParams<T>,
) -> Result<Vec<ScoredCorner<T>>, Error>
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    let ndim = surface.ndim();
    if ndim != 2 {
        return Err(Error::InvalidShape {
            expected: 2,
            actual: ndim,
        });
    }
    if params.threshold.is_nan() {
        return Err(Error::InvalidThreshold);
    }

    let surface = surface
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::InvalidShape {
            expected: 2,
            actual: ndim,
        })?;

    if surface.is_empty() {
        return Ok(Vec::new());
    }

    let mut corners = collect_candidates(surface, params.threshold);

    // Stable sort: equal responses keep their scan order. NaN never passes the
    // threshold, so the comparison is total here.
    corners.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if params.ties == TiePolicy::LastWins {
        corners = keep_last_per_score(corners);
    }

    if let Some(count) = params.count {
        corners.truncate(count.get());
    }

    Ok(corners)
}

#[cfg(not(feature = "rayon"))]
fn collect_candidates<T: Element>(surface: ArrayView2<'_, T>, threshold: T) -> Vec<ScoredCorner<T>> {
    let mut out = Vec::new();
    for ((r, c), &v) in surface.indexed_iter() {
        if v > threshold {
            out.push(ScoredCorner { rc: [r, c], score: v });
        }
    }
    out
}

// Rows are scanned in parallel and concatenated in order, so the result is the
// same as the sequential scan.
#[cfg(feature = "rayon")]
fn collect_candidates<T: Element>(surface: ArrayView2<'_, T>, threshold: T) -> Vec<ScoredCorner<T>> {
    let rows: Vec<Vec<ScoredCorner<T>>> = (0..surface.nrows())
        .into_par_iter()
        .map(|r| {
            surface
                .row(r)
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v > threshold)
                .map(|(c, &v)| ScoredCorner { rc: [r, c], score: v })
                .collect()
        })
        .collect();
    rows.concat()
}

/// Collapse runs of equal scores to their last element. Expects `corners`
/// sorted by score with ties in scan order.
fn keep_last_per_score<T: Element>(corners: Vec<ScoredCorner<T>>) -> Vec<ScoredCorner<T>> {
    let mut out: Vec<ScoredCorner<T>> = Vec::with_capacity(corners.len());
    for c in corners {
        match out.last_mut() {
            Some(prev) if prev.score == c.score => *prev = c,
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3, ArrayD, IxDyn};

    fn column_surface() -> Array2<f32> {
        array![[0.0, 0.1, 0.0], [0.0, 0.3, 0.0], [0.0, 0.2, 0.0]]
    }

    #[test]
    fn single_peak_is_the_only_corner() {
        let s = array![[0.0f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        let corners = extract_corners(&s, &ExtractParams::default()).unwrap();
        assert_eq!(corners, vec![[1, 1]]);
    }

    #[test]
    fn corners_are_ranked_by_descending_response() {
        let corners = extract_corners(&column_surface(), &ExtractParams::default()).unwrap();
        assert_eq!(corners, vec![[1, 1], [2, 1], [0, 1]]);
    }

    #[test]
    fn count_truncates_to_the_strongest() {
        let params = ExtractParams::new().with_count(1);
        let corners = extract_corners(&column_surface(), &params).unwrap();
        assert_eq!(corners, vec![[1, 1]]);

        let params = ExtractParams::new().with_count(10);
        assert_eq!(extract_corners(&column_surface(), &params).unwrap().len(), 3);
    }

    #[test]
    fn zero_count_means_unlimited() {
        let params = ExtractParams::<f32>::new().with_count(0);
        assert!(params.count.is_none());
        assert_eq!(extract_corners(&column_surface(), &params).unwrap().len(), 3);
    }

    #[test]
    fn threshold_is_exclusive() {
        let params = ExtractParams::new().with_threshold(0.2);
        let corners = extract_corners(&column_surface(), &params).unwrap();
        assert_eq!(corners, vec![[1, 1]]);
    }

    #[test]
    fn negative_threshold_admits_zero_cells() {
        let s = array![[0i32, -2], [3, -1]];
        let params = ExtractParams::new().with_threshold(-2);
        let corners = extract_corners(&s, &params).unwrap();
        assert_eq!(corners, vec![[1, 0], [0, 0], [1, 1]]);
    }

    #[test]
    fn empty_surface_is_not_an_error() {
        let s = Array2::<f32>::zeros((0, 4));
        assert!(extract_corners(&s, &ExtractParams::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn non_2d_input_is_rejected() {
        let s = Array3::<f32>::zeros((2, 2, 2));
        let err = extract_corners(&s, &ExtractParams::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidShape {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn dynamic_2d_input_is_accepted() {
        let s = ArrayD::<f64>::from_shape_vec(IxDyn(&[2, 2]), vec![0.0, 0.5, 0.9, 0.0]).unwrap();
        let corners = extract_corners(&s, &ExtractParams::default()).unwrap();
        assert_eq!(corners, vec![[1, 0], [0, 1]]);
    }

    #[test]
    fn nan_threshold_is_rejected_and_nan_cells_are_skipped() {
        let params = ExtractParams::new().with_threshold(f32::NAN);
        let err = extract_corners(&column_surface(), &params).unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold));

        let s = array![[f32::NAN, 0.5], [1.0, f32::NAN]];
        let corners = extract_corners(&s, &ExtractParams::default()).unwrap();
        assert_eq!(corners, vec![[1, 0], [0, 1]]);
    }

    #[test]
    fn ties_keep_every_cell_in_scan_order_by_default() {
        let s = array![[0.5f32, 0.0, 0.5], [0.0, 0.9, 0.0], [0.5, 0.0, 0.0]];
        let corners = extract_corners(&s, &ExtractParams::default()).unwrap();
        assert_eq!(corners, vec![[1, 1], [0, 0], [0, 2], [2, 0]]);
    }

    #[test]
    fn last_wins_keeps_one_cell_per_response() {
        let s = array![[0.5f32, 0.0, 0.5], [0.0, 0.9, 0.0], [0.5, 0.0, 0.0]];
        let params = ExtractParams::new().with_ties(TiePolicy::LastWins);
        let corners = extract_corners(&s, &params).unwrap();
        assert_eq!(corners, vec![[1, 1], [2, 0]]);
    }

    #[test]
    fn count_applies_after_tie_resolution() {
        let s = array![[0.5f32, 0.5, 0.5], [0.1, 0.0, 0.0]];
        let keep_all = ExtractParams::new().with_count(2);
        assert_eq!(extract_corners(&s, &keep_all).unwrap(), vec![[0, 0], [0, 1]]);

        let last = keep_all.with_ties(TiePolicy::LastWins);
        assert_eq!(extract_corners(&s, &last).unwrap(), vec![[0, 2], [1, 0]]);
    }

    #[test]
    fn transposed_view_reports_view_coordinates() {
        let s = column_surface();
        let corners = extract_corners(&s.t(), &ExtractParams::default()).unwrap();
        assert_eq!(corners, vec![[1, 1], [1, 2], [1, 0]]);
    }

    #[test]
    fn scored_corners_carry_their_response() {
        let scored = extract_scored(&column_surface(), &ExtractParams::default()).unwrap();
        let scores: Vec<f32> = scored.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.3, 0.2, 0.1]);
    }
}
