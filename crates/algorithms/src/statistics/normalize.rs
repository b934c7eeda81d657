//! Robust rescaling of raw scores

use super::quantile::{quantile_sorted, sorted_finite};
use ndarray::Array2;
use satyadrishti_core::ScoreMap;

/// Raw score mapped to 0
pub const LOWER_PERCENTILE: f64 = 0.01;
/// Raw score mapped to 1
pub const UPPER_PERCENTILE: f64 = 0.99;

/// Rescale raw scores so the 1st percentile maps to 0 and the 99th to 1,
/// clipping outside that band.
///
/// When the two percentiles coincide there is no usable dynamic range and
/// the result is all zeros. Non-finite raw scores map to 0.
pub fn robust_normalize(raw: Array2<f64>) -> ScoreMap {
    let sorted = sorted_finite(raw.iter().copied());
    let range = quantile_sorted(&sorted, LOWER_PERCENTILE)
        .zip(quantile_sorted(&sorted, UPPER_PERCENTILE))
        .filter(|(lo, hi)| hi > lo);

    let normalized = match range {
        Some((lo, hi)) => {
            let span = hi - lo;
            raw.mapv(|v| {
                if v.is_finite() {
                    ((v - lo) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
        }
        None => Array2::zeros(raw.dim()),
    };
    ScoreMap::from_array(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_input_is_zero() {
        let out = robust_normalize(Array2::from_elem((4, 4), 3.5));
        assert!(out.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_range_and_clipping() {
        let raw = Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as f64);
        let out = robust_normalize(raw);
        assert!(out.values().all(|v| (0.0..=1.0).contains(&v)));
        assert_eq!(out.get(0, 0).unwrap(), 0.0);
        assert_eq!(out.get(9, 9).unwrap(), 1.0);
        // p1 = 0.99, p99 = 98.01; 49.5 is the midpoint
        let mid = out.get(4, 9).unwrap();
        assert!((mid - (49.0 - 0.99) / (98.01 - 0.99)).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_maps_to_zero() {
        let mut raw = Array2::from_shape_fn((2, 3), |(r, c)| (r * 3 + c) as f64);
        raw[(1, 1)] = f64::NAN;
        let out = robust_normalize(raw);
        assert_eq!(out.get(1, 1).unwrap(), 0.0);
    }
}
