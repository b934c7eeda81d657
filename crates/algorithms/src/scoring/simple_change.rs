//! Band-averaged absolute difference between two frames

use super::{Algorithm, FramePair, Scorer};
use crate::statistics::robust_normalize;
use satyadrishti_core::{Error, Frame, Result, ScoreMap};

/// Compute the normalized simple change score.
///
/// `change = |mean_b(after) - mean_b(before)|` per pixel, then robust
/// 1st/99th percentile normalization.
///
/// # Errors
/// `ShapeMismatch` when the frames differ in bands, rows or columns.
pub fn simple_change(before: &Frame, after: &Frame) -> Result<ScoreMap> {
    if before.shape() != after.shape() {
        return Err(Error::ShapeMismatch {
            expected: before.shape(),
            actual: after.shape(),
        });
    }

    let diff = (after.band_mean() - before.band_mean()).mapv(f64::abs);
    Ok(robust_normalize(diff))
}

/// Simple change scorer over a frame pair
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleChangeScorer;

impl Scorer for SimpleChangeScorer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Simple
    }

    fn score(&self, frames: &FramePair<'_>) -> Result<ScoreMap> {
        simple_change(frames.before, frames.after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_frames_are_zero() {
        let a = Frame::filled(3, 4, 4, 0.4).unwrap();
        let score = simple_change(&a, &a.clone()).unwrap();
        assert_eq!(score.shape(), (4, 4));
        assert!(score.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_changed_pixel_scores_highest() {
        let before = Frame::filled(2, 5, 5, 0.2).unwrap();
        let mut data = before.data().clone();
        data[(0, 1, 3)] = 0.6;
        data[(1, 1, 3)] = 0.6;
        let after = Frame::new(data).unwrap();

        let score = simple_change(&before, &after).unwrap();
        assert_eq!(score.get(1, 3).unwrap(), 1.0);
        assert_eq!(score.get(0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Frame::filled(3, 4, 4, 0.1).unwrap();
        let b = Frame::filled(3, 4, 5, 0.1).unwrap();
        let err = simple_change(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: (3, 4, 4),
                actual: (3, 4, 5)
            }
        ));
    }

    #[test]
    fn test_band_count_mismatch() {
        let a = Frame::filled(3, 4, 4, 0.1).unwrap();
        let b = Frame::filled(2, 4, 4, 0.1).unwrap();
        assert!(simple_change(&a, &b).is_err());
    }
}
