//! Per-run confidence and metadata records

use crate::weather::WeatherSample;
use serde::{Deserialize, Serialize};

/// Detection threshold and how much to trust the resulting mask.
///
/// `final_confidence == clamp(base_confidence * weather_penalty, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    pub threshold: f64,
    pub base_confidence: f64,
    pub weather_penalty: f64,
    pub final_confidence: f64,
}

/// Everything persisted alongside a score map and mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Frame references, earliest first
    pub frames: Vec<String>,
    /// Algorithm name (`simple` or `rx`)
    #[serde(rename = "algo")]
    pub algorithm: String,
    #[serde(flatten)]
    pub confidence: ConfidenceResult,
    /// Weather snapshot used for the penalty
    #[serde(rename = "weather_curr")]
    pub weather: WeatherSample,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_field_set() {
        let meta = RunMetadata {
            frames: vec!["frame_00.tif".into(), "frame_01.tif".into()],
            algorithm: "rx".into(),
            confidence: ConfidenceResult {
                threshold: 0.8,
                base_confidence: 1.0,
                weather_penalty: 0.9,
                final_confidence: 0.9,
            },
            weather: WeatherSample::with_conditions(0.2, 0.0),
        };

        let value = serde_json::to_value(&meta).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "algo",
                "base_confidence",
                "final_confidence",
                "frames",
                "threshold",
                "weather_curr",
                "weather_penalty",
            ]
        );
        assert_eq!(obj["weather_curr"]["tcc"], 0.2);

        let back: RunMetadata = serde_json::from_value(value).unwrap();
        assert_eq!(back, meta);
    }
}
