//! Quantile thresholding

use crate::statistics::quantile;
use satyadrishti_core::{Error, Mask, Result, ScoreMap};

/// Default detection quantile
pub const DEFAULT_QUANTILE: f64 = 0.99;

/// Quantiles must lie strictly inside (0, 1)
pub fn validate_quantile(q: f64) -> Result<()> {
    if q > 0.0 && q < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "quantile",
            value: q.to_string(),
            reason: "must lie strictly between 0 and 1".into(),
        })
    }
}

/// Binarize a score map at its own q-th quantile.
///
/// A cell is a detection when its score is at least the threshold
/// (ties at the boundary are all positive) and above zero. Zero marks
/// background after normalization, so a flat map yields an empty mask.
///
/// # Returns
/// Tuple of (mask, threshold)
pub fn threshold_mask(score: &ScoreMap, q: f64) -> Result<(Mask, f64)> {
    validate_quantile(q)?;

    let threshold = quantile(score.values(), q).ok_or(Error::InvalidDimensions {
        bands: 1,
        rows: score.rows(),
        cols: score.cols(),
    })?;

    let mask = score.map(|v| u8::from(v >= threshold && v > 0.0));
    Ok((mask, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use satyadrishti_core::Raster;

    fn ramp(rows: usize, cols: usize) -> ScoreMap {
        let n = (rows * cols) as f64;
        Raster::from_vec((0..rows * cols).map(|i| (i + 1) as f64 / n).collect(), rows, cols)
            .unwrap()
    }

    #[test]
    fn test_quantile_bounds() {
        assert!(validate_quantile(0.5).is_ok());
        for q in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = validate_quantile(q).unwrap_err();
            assert!(err.is_configuration(), "q = {} should be rejected", q);
        }
    }

    #[test]
    fn test_top_fraction() {
        let score = ramp(10, 10);
        let (mask, threshold) = threshold_mask(&score, 0.9).unwrap();
        // position 0.9 * 99 = 89.1 -> between 0.90 and 0.91
        assert!((threshold - 0.901).abs() < 1e-9, "threshold {}", threshold);
        assert_eq!(mask.count_nonzero(), 10);
    }

    #[test]
    fn test_inclusive_ties() {
        let score = Raster::from_vec(vec![0.2, 0.5, 0.5, 0.5], 2, 2).unwrap();
        let (mask, threshold) = threshold_mask(&score, 0.5).unwrap();
        assert_eq!(threshold, 0.5);
        assert_eq!(mask.count_nonzero(), 3);
        assert_eq!(mask.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_flat_map_has_no_detections() {
        let score: ScoreMap = Raster::new(4, 4);
        let (mask, threshold) = threshold_mask(&score, 0.99).unwrap();
        assert_eq!(threshold, 0.0);
        assert_eq!(mask.count_nonzero(), 0);
    }

    #[test]
    fn test_invalid_quantile_rejected_before_work() {
        let score = ramp(2, 2);
        assert!(threshold_mask(&score, 1.0).is_err());
    }
}
