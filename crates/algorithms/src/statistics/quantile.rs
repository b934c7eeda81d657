//! Quantiles by linear interpolation between closest ranks
//!
//! For `n` sorted values the q-th quantile sits at position `q * (n - 1)`;
//! fractional positions interpolate between the two neighbouring values.
//! Non-finite values are ignored.

/// Finite values sorted ascending
pub fn sorted_finite<I: IntoIterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of already-sorted data. `None` when `sorted` is empty.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile of unsorted data
pub fn quantile<I: IntoIterator<Item = f64>>(values: I, q: f64) -> Option<f64> {
    quantile_sorted(&sorted_finite(values), q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_endpoints() {
        let v = [3.0, 1.0, 2.0];
        assert_eq!(quantile(v, 0.0), Some(1.0));
        assert_eq!(quantile(v, 1.0), Some(3.0));
        assert_eq!(quantile(v, 0.5), Some(2.0));
    }

    #[test]
    fn test_quantile_interpolates() {
        // position 0.99 * 9 = 8.91 between 8 and 9
        let v: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let q = quantile(v, 0.99).unwrap();
        assert!((q - 8.91).abs() < 1e-12, "Expected 8.91, got {}", q);
    }

    #[test]
    fn test_quantile_skips_nan() {
        let v = [f64::NAN, 4.0, 2.0, f64::INFINITY];
        assert_eq!(quantile(v, 1.0), Some(4.0));
    }

    #[test]
    fn test_quantile_empty() {
        assert_eq!(quantile(Vec::new(), 0.5), None);
        assert_eq!(quantile([f64::NAN], 0.5), None);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(quantile([0.7], 0.01), Some(0.7));
    }
}
