//! Band covariance and its ridge-regularized factorization
//!
//! The covariance is factored as `C = L Lᵀ` (Cholesky). A factorization
//! exists exactly when the regularized matrix is positive-definite, and the
//! squared Mahalanobis distance `xᵀ C⁻¹ x` is then `|L⁻¹ x|²`, obtained by
//! forward substitution without forming the inverse.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use satyadrishti_core::{Error, Result};
use tracing::warn;

/// Default ridge added to the covariance diagonal
pub const DEFAULT_RIDGE: f64 = 1e-6;

/// Extra ridge added for the single retry after a failed factorization
pub const RETRY_RIDGE: f64 = 1e-3;

/// Per-band mean and sample covariance of a set of pixels
#[derive(Debug, Clone)]
pub struct BandStatistics {
    /// Mean of each band
    pub mean: Vec<f64>,
    /// `bands x bands` covariance with divisor `max(1, n - 1)`
    pub covariance: Array2<f64>,
}

/// Mean vector and unbiased covariance of `samples` (`bands x pixels`).
pub fn band_statistics(samples: ArrayView2<f64>) -> BandStatistics {
    let (bands, n) = samples.dim();

    let mean: Vec<f64> = samples
        .axis_iter(Axis(0))
        .map(|band| if n > 0 { band.sum() / n as f64 } else { 0.0 })
        .collect();

    let mut centered = samples.to_owned();
    for (mut band, m) in centered.axis_iter_mut(Axis(0)).zip(&mean) {
        band -= *m;
    }

    let divisor = n.saturating_sub(1).max(1) as f64;
    let mut covariance = centered.dot(&centered.t()) / divisor;

    // Symmetric by construction; remove rounding asymmetry
    for i in 0..bands {
        for j in (i + 1)..bands {
            let v = 0.5 * (covariance[(i, j)] + covariance[(j, i)]);
            covariance[(i, j)] = v;
            covariance[(j, i)] = v;
        }
    }

    BandStatistics { mean, covariance }
}

/// Lower-triangular Cholesky factor of a symmetric positive-definite matrix
#[derive(Debug, Clone)]
pub struct CholeskyFactor {
    lower: Array2<f64>,
}

impl CholeskyFactor {
    /// Factor `matrix`, or `None` when it is not numerically positive-definite
    pub fn new(matrix: &Array2<f64>) -> Option<Self> {
        let n = matrix.nrows();
        if matrix.ncols() != n {
            return None;
        }

        let mut lower = Array2::<f64>::zeros((n, n));
        for j in 0..n {
            let mut diag = matrix[(j, j)];
            for k in 0..j {
                diag -= lower[(j, k)] * lower[(j, k)];
            }
            if !(diag.is_finite() && diag > 0.0) {
                return None;
            }
            let pivot = diag.sqrt();
            lower[(j, j)] = pivot;

            for i in (j + 1)..n {
                let mut v = matrix[(i, j)];
                for k in 0..j {
                    v -= lower[(i, k)] * lower[(j, k)];
                }
                lower[(i, j)] = v / pivot;
            }
        }
        Some(Self { lower })
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.lower.nrows()
    }

    /// The factor `L`
    pub fn lower(&self) -> &Array2<f64> {
        &self.lower
    }

    /// `xᵀ C⁻¹ x` for a centered vector `x`
    pub fn mahalanobis_sq(&self, x: ArrayView1<f64>) -> f64 {
        let n = self.dim();
        let mut y = vec![0.0; n];
        let mut total = 0.0;
        for i in 0..n {
            let mut v = x[i];
            for (k, yk) in y.iter().enumerate().take(i) {
                v -= self.lower[(i, k)] * yk;
            }
            let yi = v / self.lower[(i, i)];
            y[i] = yi;
            total += yi * yi;
        }
        total
    }
}

/// Outcome of the ridge-regularized factorization
#[derive(Debug, Clone)]
pub struct RegularizedCovariance {
    pub factor: CholeskyFactor,
    /// Total ridge that was on the diagonal when factoring succeeded
    pub ridge: f64,
    /// Whether the first attempt failed and the retry ridge was needed
    pub retried: bool,
}

/// Add `epsilon` to the diagonal and factor; on failure add [`RETRY_RIDGE`]
/// on top and try exactly once more.
///
/// Fails with `SingularCovariance` when both attempts fail.
pub fn regularize_and_factor(covariance: &Array2<f64>, epsilon: f64) -> Result<RegularizedCovariance> {
    let bands = covariance.nrows();
    let attempts = [epsilon, epsilon + RETRY_RIDGE];

    for (attempt, &ridge) in attempts.iter().enumerate() {
        let mut regularized = covariance.clone();
        regularized.diag_mut().mapv_inplace(|d| d + ridge);

        if let Some(factor) = CholeskyFactor::new(&regularized) {
            return Ok(RegularizedCovariance {
                factor,
                ridge,
                retried: attempt > 0,
            });
        }
        warn!(
            "Covariance of {} bands not positive-definite with ridge {:e}",
            bands, ridge
        );
    }

    Err(Error::SingularCovariance {
        bands,
        ridge: attempts[attempts.len() - 1],
    })
}
