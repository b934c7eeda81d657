//! # Satyadrishti Algorithms
//!
//! Anomaly and change detection over multi-band frames.
//!
//! ## Modules
//!
//! - **scoring**: RX anomaly and simple change scorers behind one `Scorer` trait
//! - **detection**: quantile thresholding and weather-aware confidence
//! - **statistics**: quantiles and robust normalization
//! - **pipeline**: runs the selected scorers and picks the best result

mod maybe_rayon;

pub mod detection;
pub mod pipeline;
pub mod scoring;
pub mod statistics;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::detection::{
        base_confidence, estimate_confidence, threshold_mask, weather_penalty, DEFAULT_QUANTILE,
    };
    pub use crate::pipeline::{
        run_detection, AlgorithmFailure, AlgorithmRun, DetectionConfig, DetectionInput,
        DetectionReport,
    };
    pub use crate::scoring::{
        rx_score, simple_change, Algorithm, AlgorithmSelector, FramePair, RxParams, RxScorer,
        Scorer, SimpleChangeScorer,
    };
    pub use crate::statistics::{quantile, robust_normalize};
    pub use satyadrishti_core::prelude::*;
}
