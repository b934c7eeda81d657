//! Anomaly and change scorers
//!
//! Every scorer turns a frame pair into a normalized [`ScoreMap`]:
//! - **Simple change**: band-mean absolute difference between the frames
//! - **RX**: Mahalanobis distance of the "after" frame against its own background

mod covariance;
mod rx;
mod simple_change;

pub use covariance::{
    band_statistics, regularize_and_factor, BandStatistics, CholeskyFactor,
    RegularizedCovariance, DEFAULT_RIDGE, RETRY_RIDGE,
};
pub use rx::{rx_distances, rx_score, RxParams, RxScorer};
pub use simple_change::{simple_change, SimpleChangeScorer};

use satyadrishti_core::{Error, Frame, Result, ScoreMap};
use std::fmt;
use std::str::FromStr;

/// Two consecutive frames of the same scene
#[derive(Debug, Clone, Copy)]
pub struct FramePair<'a> {
    pub before: &'a Frame,
    pub after: &'a Frame,
}

impl<'a> FramePair<'a> {
    pub fn new(before: &'a Frame, after: &'a Frame) -> Self {
        Self { before, after }
    }
}

/// Uniform capability shared by all scoring algorithms.
///
/// Scorers are pure: identical frames always give an identical score map.
pub trait Scorer: Send + Sync {
    /// Which algorithm this scorer implements
    fn algorithm(&self) -> Algorithm;

    /// Score the pair
    fn score(&self, frames: &FramePair<'_>) -> Result<ScoreMap>;
}

/// A single scoring algorithm.
///
/// Declaration order is the priority order used to break confidence ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Simple,
    Rx,
}

impl Algorithm {
    /// Name used in artifact file names and metadata
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Simple => "simple",
            Algorithm::Rx => "rx",
        }
    }

    /// Scorer implementing this algorithm
    pub fn scorer(self, rx: RxParams) -> Box<dyn Scorer> {
        match self {
            Algorithm::Simple => Box::new(SimpleChangeScorer),
            Algorithm::Rx => Box::new(RxScorer::new(rx)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which algorithms an invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmSelector {
    Simple,
    Rx,
    #[default]
    Both,
}

impl AlgorithmSelector {
    /// Selected algorithms in priority order
    pub fn algorithms(self) -> &'static [Algorithm] {
        match self {
            AlgorithmSelector::Simple => &[Algorithm::Simple],
            AlgorithmSelector::Rx => &[Algorithm::Rx],
            AlgorithmSelector::Both => &[Algorithm::Simple, Algorithm::Rx],
        }
    }
}

impl FromStr for AlgorithmSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(AlgorithmSelector::Simple),
            "rx" => Ok(AlgorithmSelector::Rx),
            "both" => Ok(AlgorithmSelector::Both),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for AlgorithmSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlgorithmSelector::Simple => "simple",
            AlgorithmSelector::Rx => "rx",
            AlgorithmSelector::Both => "both",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!("simple".parse::<AlgorithmSelector>().unwrap(), AlgorithmSelector::Simple);
        assert_eq!("RX".parse::<AlgorithmSelector>().unwrap(), AlgorithmSelector::Rx);
        assert_eq!(" both ".parse::<AlgorithmSelector>().unwrap(), AlgorithmSelector::Both);

        let err = "pca".parse::<AlgorithmSelector>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_selector_order() {
        assert_eq!(
            AlgorithmSelector::Both.algorithms(),
            &[Algorithm::Simple, Algorithm::Rx]
        );
        assert_eq!(AlgorithmSelector::default(), AlgorithmSelector::Both);
    }

    #[test]
    fn test_scorer_dispatch() {
        let before = Frame::filled(2, 3, 3, 0.2).unwrap();
        let after = Frame::filled(2, 3, 3, 0.2).unwrap();
        let pair = FramePair::new(&before, &after);

        for &alg in AlgorithmSelector::Both.algorithms() {
            let scorer = alg.scorer(RxParams::default());
            assert_eq!(scorer.algorithm(), alg);
            let score = scorer.score(&pair).unwrap();
            assert!(score.values().all(|v| v == 0.0), "{} should be flat", alg);
        }
    }
}
