//! Feature record built around extracted corner coordinates.
use crate::element::Element;
use crate::error::Error;
use crate::extract::ScoredCorner;
use num_traits::ToPrimitive;

/// A detected point with its scale level and spatial extent.
///
/// The extractor only reports coordinates and responses; detectors wrap them
/// into features once they know the octave and window size.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Row index in the surface.
    pub x: usize,
    /// Column index in the surface.
    pub y: usize,
    /// Scale level the feature was detected at (0 for full resolution).
    pub octave: u32,
    /// Spatial extent along rows, in pixels.
    pub width: f32,
    /// Spatial extent along columns, in pixels.
    pub height: f32,
    /// Detector response.
    pub score: f32,
}

impl Feature {
    /// Build a feature at `[row, column]`, rejecting non-positive extents.
    pub fn new(
        rc: [usize; 2],
        octave: u32,
        width: f32,
        height: f32,
        score: f32,
    ) -> Result<Self, Error> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidExtent { width, height });
        }
        Ok(Self {
            x: rc[0],
            y: rc[1],
            octave,
            width,
            height,
            score,
        })
    }

    /// `[row, column]` of the feature.
    #[inline]
    pub fn rc(&self) -> [usize; 2] {
        [self.x, self.y]
    }
}

/// Wrap scored corners into features sharing one octave and extent.
///
/// Order is preserved, so the features stay ranked by response.
pub fn features_from_scored<T: Element>(
    corners: &[ScoredCorner<T>],
    octave: u32,
    width: f32,
    height: f32,
) -> Result<Vec<Feature>, Error> {
    corners
        .iter()
        .map(|c| {
            let score = c.score.to_real().to_f32().unwrap_or(f32::NAN);
            Feature::new(c.rc, octave, width, height, score)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_extent() {
        assert!(matches!(
            Feature::new([0, 0], 0, 0.0, 1.0, 1.0),
            Err(Error::InvalidExtent { .. })
        ));
        assert!(Feature::new([0, 0], 0, 1.0, f32::NAN, 1.0).is_err());
        assert!(Feature::new([0, 0], 0, 1.0, -2.0, 1.0).is_err());
    }

    #[test]
    fn wraps_scored_corners_in_order() {
        let corners = [
            ScoredCorner {
                rc: [4, 2],
                score: 9u8,
            },
            ScoredCorner {
                rc: [0, 7],
                score: 3u8,
            },
        ];
        let features = features_from_scored(&corners, 2, 3.0, 3.0).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].rc(), [4, 2]);
        assert_eq!(features[0].score, 9.0);
        assert_eq!(features[1].octave, 2);
        assert_eq!((features[1].x, features[1].y), (0, 7));
    }

    #[test]
    fn bad_extent_fails_the_whole_batch() {
        let corners = [ScoredCorner {
            rc: [1, 1],
            score: 0.5f64,
        }];
        assert!(features_from_scored(&corners, 0, 1.0, 0.0).is_err());
    }
}
