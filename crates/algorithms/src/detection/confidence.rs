//! Confidence estimation
//!
//! `base = clamp((max - mean) / (std + ε), 0, 1)` measures how far the
//! strongest response stands out from the background spread.
//!
//! `penalty = clamp((1 - 0.5·cloud) · (1 - min(1, 0.2·precip)), 0, 1)`
//! derates it for sensing conditions. The factors multiply, so either one
//! alone can drive the penalty to zero.

use satyadrishti_core::{ConfidenceResult, ScoreMap, WeatherSample};

/// Added to the standard deviation to keep `base` finite on flat maps
pub const CONFIDENCE_EPSILON: f64 = 1e-6;

const CLOUD_WEIGHT: f64 = 0.5;
const PRECIP_WEIGHT: f64 = 0.2;

/// Separation of the peak score from the mean, in standard deviations, capped at 1
pub fn base_confidence(score: &ScoreMap) -> f64 {
    let stats = score.statistics();
    match (stats.max, stats.mean, stats.std_dev) {
        (Some(max), Some(mean), Some(std)) => {
            let base = (max - mean) / (std + CONFIDENCE_EPSILON);
            if base.is_finite() {
                base.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Multiplicative derating for cloud cover and precipitation, in `[0, 1]`
pub fn weather_penalty(weather: &WeatherSample) -> f64 {
    let cloud = 1.0 - CLOUD_WEIGHT * weather.cloud_cover;
    let precip = 1.0 - (PRECIP_WEIGHT * weather.precipitation_rate).min(1.0);
    let penalty = cloud * precip;
    if penalty.is_finite() {
        penalty.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Combine statistical separation and weather into a [`ConfidenceResult`]
pub fn estimate_confidence(
    score: &ScoreMap,
    threshold: f64,
    weather: &WeatherSample,
) -> ConfidenceResult {
    let base_confidence = base_confidence(score);
    let weather_penalty = weather_penalty(weather);
    ConfidenceResult {
        threshold,
        base_confidence,
        weather_penalty,
        final_confidence: (base_confidence * weather_penalty).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satyadrishti_core::Raster;

    #[test]
    fn test_clear_sky_is_exactly_one() {
        assert_eq!(weather_penalty(&WeatherSample::clear_sky()), 1.0);
    }

    #[test]
    fn test_overcast_and_rain_is_zero() {
        assert_eq!(weather_penalty(&WeatherSample::with_conditions(1.0, 5.0)), 0.0);
    }

    #[test]
    fn test_partial_conditions() {
        let p = weather_penalty(&WeatherSample::with_conditions(0.4, 1.0));
        assert!((p - 0.8 * 0.8).abs() < 1e-12, "Expected 0.64, got {}", p);
    }

    #[test]
    fn test_out_of_range_weather_clamps() {
        assert_eq!(weather_penalty(&WeatherSample::with_conditions(3.0, 0.0)), 0.0);
        assert_eq!(weather_penalty(&WeatherSample::with_conditions(0.0, -2.0)), 1.0);
        assert_eq!(weather_penalty(&WeatherSample::with_conditions(f64::NAN, 0.0)), 0.0);
    }

    #[test]
    fn test_flat_map_has_zero_base() {
        let score: ScoreMap = Raster::new(4, 4);
        assert_eq!(base_confidence(&score), 0.0);
    }

    #[test]
    fn test_single_peak_saturates() {
        let mut score: ScoreMap = Raster::new(8, 8);
        score.set(3, 3, 1.0).unwrap();
        assert_eq!(base_confidence(&score), 1.0);
    }

    #[test]
    fn test_uniform_spread_is_below_one() {
        // two-valued map: (max - mean) / std = 1 exactly, minus ε effect
        let score = Raster::from_vec(vec![0.0, 1.0, 0.0, 1.0], 2, 2).unwrap();
        let base = base_confidence(&score);
        assert!(base < 1.0 && base > 0.999, "got {}", base);
    }

    #[test]
    fn test_final_is_product() {
        let mut score: ScoreMap = Raster::new(4, 4);
        score.set(0, 0, 1.0).unwrap();
        let weather = WeatherSample::with_conditions(0.2, 0.0);
        let result = estimate_confidence(&score, 0.5, &weather);
        assert_eq!(result.threshold, 0.5);
        assert_eq!(result.base_confidence, 1.0);
        assert!((result.weather_penalty - 0.9).abs() < 1e-12);
        assert_eq!(
            result.final_confidence,
            (result.base_confidence * result.weather_penalty).clamp(0.0, 1.0)
        );
    }
}
