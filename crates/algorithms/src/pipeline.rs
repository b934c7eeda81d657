//! End-to-end detection over a pair of frames
//!
//! For every selected algorithm: score, threshold, estimate confidence and
//! assemble the run metadata. Runs are independent and read only the
//! shared inputs, so they execute concurrently and are joined before the
//! best run is chosen.

use crate::detection::{estimate_confidence, threshold_mask, validate_quantile, DEFAULT_QUANTILE};
use crate::maybe_rayon::*;
use crate::scoring::{Algorithm, AlgorithmSelector, FramePair, RxParams};
use satyadrishti_core::{Error, Frame, Mask, Result, RunMetadata, ScoreMap, WeatherSample};
use tracing::{debug, info, warn};

/// Parameters for one detection invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    /// Algorithms to run
    pub selector: AlgorithmSelector,
    /// Quantile used for the global threshold, strictly inside (0, 1)
    pub quantile: f64,
    /// RX parameters
    pub rx: RxParams,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            selector: AlgorithmSelector::Both,
            quantile: DEFAULT_QUANTILE,
            rx: RxParams::default(),
        }
    }
}

impl DetectionConfig {
    /// Reject invalid parameters before any work starts
    pub fn validate(&self) -> Result<()> {
        validate_quantile(self.quantile)?;
        self.rx.validate()
    }
}

/// Frame references recorded when the caller supplies none
pub const DEFAULT_FRAME_REFS: [&str; 2] = ["frame_00", "frame_01"];

/// Immutable inputs shared by every run
#[derive(Debug, Clone)]
pub struct DetectionInput<'a> {
    pub before: &'a Frame,
    pub after: &'a Frame,
    /// Weather at acquisition of `after`
    pub weather: WeatherSample,
    /// Frame references recorded in metadata, earliest first
    pub frame_refs: Vec<String>,
}

impl<'a> DetectionInput<'a> {
    pub fn new(before: &'a Frame, after: &'a Frame, weather: WeatherSample) -> Self {
        Self {
            before,
            after,
            weather,
            frame_refs: DEFAULT_FRAME_REFS.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Replace the frame references recorded in metadata
    pub fn with_frame_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frame_refs = refs.into_iter().map(Into::into).collect();
        self
    }
}

/// Output of one successful algorithm
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub score_map: ScoreMap,
    pub mask: Mask,
    pub metadata: RunMetadata,
}

impl AlgorithmRun {
    pub fn final_confidence(&self) -> f64 {
        self.metadata.confidence.final_confidence
    }
}

/// An algorithm that failed; the others still ran
#[derive(Debug)]
pub struct AlgorithmFailure {
    pub algorithm: Algorithm,
    pub error: Error,
}

/// All runs of one invocation
#[derive(Debug)]
pub struct DetectionReport {
    /// Successful runs in priority order
    pub runs: Vec<AlgorithmRun>,
    /// Contained failures in priority order
    pub failures: Vec<AlgorithmFailure>,
    best: Option<usize>,
}

impl DetectionReport {
    /// Run designated as the generic alias, if any run succeeded
    pub fn best(&self) -> Option<&AlgorithmRun> {
        self.best.map(|i| &self.runs[i])
    }

    /// Run of a specific algorithm
    pub fn run(&self, algorithm: Algorithm) -> Option<&AlgorithmRun> {
        self.runs.iter().find(|r| r.algorithm == algorithm)
    }

    /// Whether every selected algorithm succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run every selected algorithm over the frame pair.
///
/// Configuration errors are returned before any scoring. Failures of
/// individual algorithms are collected in the report. The best run is the
/// one with the highest final confidence; ties go to the earlier algorithm
/// in priority order (simple before rx).
pub fn run_detection(input: &DetectionInput<'_>, config: &DetectionConfig) -> Result<DetectionReport> {
    config.validate()?;

    let algorithms = config.selector.algorithms();
    info!(
        "Running {} over {:?} frames",
        config.selector,
        input.after.shape()
    );

    let outcomes: Vec<std::result::Result<AlgorithmRun, AlgorithmFailure>> = algorithms
        .par_iter()
        .map(|&algorithm| {
            run_algorithm(algorithm, input, config)
                .map_err(|error| AlgorithmFailure { algorithm, error })
        })
        .collect();

    let mut runs = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(run) => runs.push(run),
            Err(failure) => {
                warn!("{} failed: {}", failure.algorithm, failure.error);
                failures.push(failure);
            }
        }
    }

    let best = select_best(&runs);
    if let Some(i) = best {
        info!(
            "Best run: {} (final confidence {:.3})",
            runs[i].algorithm,
            runs[i].final_confidence()
        );
    }

    Ok(DetectionReport {
        runs,
        failures,
        best,
    })
}

fn run_algorithm(
    algorithm: Algorithm,
    input: &DetectionInput<'_>,
    config: &DetectionConfig,
) -> Result<AlgorithmRun> {
    debug!("Starting {}", algorithm);
    let pair = FramePair::new(input.before, input.after);
    let score_map = algorithm.scorer(config.rx).score(&pair)?;
    let (mask, threshold) = threshold_mask(&score_map, config.quantile)?;
    let confidence = estimate_confidence(&score_map, threshold, &input.weather);

    info!(
        "{}: threshold {:.4}, {} detections, final confidence {:.3}",
        algorithm,
        threshold,
        mask.count_nonzero(),
        confidence.final_confidence
    );

    let metadata = RunMetadata {
        frames: input.frame_refs.clone(),
        algorithm: algorithm.name().to_string(),
        confidence,
        weather: input.weather,
    };

    Ok(AlgorithmRun {
        algorithm,
        score_map,
        mask,
        metadata,
    })
}

/// Index of the highest final confidence; the first one wins on ties
fn select_best(runs: &[AlgorithmRun]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, run) in runs.iter().enumerate() {
        match best {
            Some(b) if run.final_confidence() <= runs[b].final_confidence() => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_with_block() -> (Frame, Frame) {
        let before = Frame::filled(3, 8, 8, 0.2).unwrap();
        let mut data = before.data().clone();
        for b in 0..3 {
            for r in 2..4 {
                for c in 2..4 {
                    data[(b, r, c)] = 0.8;
                }
            }
        }
        (before, Frame::new(data).unwrap())
    }

    #[test]
    fn test_config_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.selector, AlgorithmSelector::Both);
        assert_eq!(config.quantile, 0.99);
        assert_eq!(config.rx.epsilon, 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_aborts() {
        let (before, after) = pair_with_block();
        let input = DetectionInput::new(&before, &after, WeatherSample::clear_sky());

        let config = DetectionConfig {
            quantile: 1.0,
            ..Default::default()
        };
        let err = run_detection(&input, &config).unwrap_err();
        assert!(err.is_configuration());

        let config = DetectionConfig {
            rx: RxParams { epsilon: -1.0 },
            ..Default::default()
        };
        assert!(run_detection(&input, &config).unwrap_err().is_configuration());
    }

    #[test]
    fn test_metadata_contents() {
        let (before, after) = pair_with_block();
        let weather = WeatherSample::with_conditions(0.2, 0.0);
        let input = DetectionInput::new(&before, &after, weather)
            .with_frame_refs(["frame_00.tif", "frame_01.tif"]);

        let report = run_detection(&input, &DetectionConfig::default()).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.runs.len(), 2);

        let simple = report.run(Algorithm::Simple).unwrap();
        assert_eq!(simple.metadata.algorithm, "simple");
        assert_eq!(simple.metadata.frames, vec!["frame_00.tif", "frame_01.tif"]);
        assert_eq!(simple.metadata.weather, weather);
        assert!((simple.metadata.confidence.weather_penalty - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_default_frame_refs() {
        let (before, after) = pair_with_block();
        let input = DetectionInput::new(&before, &after, WeatherSample::clear_sky());
        let report = run_detection(&input, &DetectionConfig::default()).unwrap();
        for run in &report.runs {
            assert_eq!(run.metadata.frames, vec!["frame_00", "frame_01"]);
        }
    }

    #[test]
    fn test_concurrent_runs_match_direct_scoring() {
        let (before, after) = pair_with_block();
        let input = DetectionInput::new(&before, &after, WeatherSample::clear_sky());
        let config = DetectionConfig::default();
        let report = run_detection(&input, &config).unwrap();

        let pair = FramePair::new(&before, &after);
        for run in &report.runs {
            let direct = run.algorithm.scorer(config.rx).score(&pair).unwrap();
            assert_eq!(run.score_map, direct, "{} differs from a direct call", run.algorithm);
        }
    }

    #[test]
    fn test_single_algorithm_is_best() {
        let (before, after) = pair_with_block();
        let input = DetectionInput::new(&before, &after, WeatherSample::clear_sky());
        let config = DetectionConfig {
            selector: AlgorithmSelector::Rx,
            ..Default::default()
        };
        let report = run_detection(&input, &config).unwrap();
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.best().unwrap().algorithm, Algorithm::Rx);
    }

    #[test]
    fn test_tie_goes_to_priority_order() {
        // identical frames: both maps flat, both confidences 0
        let frame = Frame::filled(2, 4, 4, 0.5).unwrap();
        let input = DetectionInput::new(&frame, &frame, WeatherSample::clear_sky());
        let report = run_detection(&input, &DetectionConfig::default()).unwrap();

        assert_eq!(report.runs.len(), 2);
        for run in &report.runs {
            assert_eq!(run.final_confidence(), 0.0);
        }
        assert_eq!(report.best().unwrap().algorithm, Algorithm::Simple);
    }
}
