//! Weather stub records as JSON

use crate::error::Result;
use crate::weather::WeatherSample;
use std::path::Path;
use tracing::warn;

/// Read a weather record from a JSON file
pub fn read_weather<P: AsRef<Path>>(path: P) -> Result<WeatherSample> {
    let path = path.as_ref();
    super::require_input(path)?;
    let text = std::fs::read_to_string(path)?;
    let sample: WeatherSample = serde_json::from_str(&text)?;
    if !sample.is_physical() {
        warn!(
            "Weather record {} out of range (cloud_cover={}, precipitation_rate={}); penalty will clamp",
            path.display(),
            sample.cloud_cover,
            sample.precipitation_rate
        );
    }
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_read_weather() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_01.json");
        std::fs::write(&path, r#"{"tcc": 0.2, "precip": 1.0}"#).unwrap();

        let w = read_weather(&path).unwrap();
        assert_eq!(w, WeatherSample::with_conditions(0.2, 1.0));
    }

    #[test]
    fn test_missing_weather() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_weather(dir.path().join("frame_01.json")).unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
    }

    #[test]
    fn test_malformed_weather() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_01.json");
        std::fs::write(&path, "{ tcc: ").unwrap();
        assert!(matches!(read_weather(&path), Err(Error::Json(_))));
    }
}
