//! RX (Reed-Xiaoli) anomaly scoring
//!
//! Each pixel's spectrum is compared with the frame's own background
//! statistics:
//!
//! `d²(x) = (x - μ)ᵀ (C + εI)⁻¹ (x - μ)`
//!
//! where μ and C are the mean and covariance over all pixels. Raw distances
//! are rescaled with [`robust_normalize`].

use super::covariance::{band_statistics, regularize_and_factor, DEFAULT_RIDGE};
use super::{Algorithm, FramePair, Scorer};
use crate::maybe_rayon::*;
use crate::statistics::robust_normalize;
use ndarray::{Array1, Array2};
use satyadrishti_core::{Error, Frame, Result, ScoreMap};
use tracing::{debug, info};

/// Parameters for RX scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RxParams {
    /// Ridge added to the covariance diagonal before factoring
    pub epsilon: f64,
}

impl Default for RxParams {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_RIDGE,
        }
    }
}

impl RxParams {
    /// Reject non-finite or negative ridge values
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                value: self.epsilon.to_string(),
                reason: "ridge must be finite and non-negative".into(),
            });
        }
        Ok(())
    }
}

/// Compute the normalized RX anomaly score of one frame.
///
/// # Arguments
/// * `frame` - Frame to score (bands x rows x cols)
/// * `params` - Ridge parameter
///
/// # Returns
/// Score map of shape (rows, cols) with values in `[0, 1]`; all zeros when
/// the raw distances have no dynamic range.
///
/// # Errors
/// `SingularCovariance` when the covariance cannot be factored even after
/// the retry ridge.
pub fn rx_score(frame: &Frame, params: &RxParams) -> Result<ScoreMap> {
    params.validate()?;
    let raw = rx_distances(frame, params)?;
    Ok(robust_normalize(raw))
}

/// Squared Mahalanobis distance of every pixel, before normalization
pub fn rx_distances(frame: &Frame, params: &RxParams) -> Result<Array2<f64>> {
    let (bands, rows, cols) = frame.shape();
    let stats = band_statistics(frame.band_samples()?);
    let regularized = regularize_and_factor(&stats.covariance, params.epsilon)?;
    if regularized.retried {
        info!("RX covariance needed retry ridge {:e}", regularized.ridge);
    }
    debug!(
        "RX background over {} pixels x {} bands",
        rows * cols,
        bands
    );

    let data = frame.data();
    let factor = &regularized.factor;
    let mean = &stats.mean;

    let d2: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut centered = Array1::<f64>::zeros(bands);
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                for b in 0..bands {
                    centered[b] = data[(b, row, col)] - mean[b];
                }
                row_data.push(factor.mahalanobis_sq(centered.view()));
            }
            row_data
        })
        .collect();

    Array2::from_shape_vec((rows, cols), d2).map_err(|e| Error::Other(e.to_string()))
}

/// RX scorer over the "after" frame of a pair
#[derive(Debug, Clone, Default)]
pub struct RxScorer {
    pub params: RxParams,
}

impl RxScorer {
    pub fn new(params: RxParams) -> Self {
        Self { params }
    }
}

impl Scorer for RxScorer {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rx
    }

    fn score(&self, frames: &FramePair<'_>) -> Result<ScoreMap> {
        rx_score(frames.after, &self.params)
    }
}
