//! Sensing-condition records

use serde::{Deserialize, Serialize};

/// Weather at acquisition time of the "current" frame.
///
/// Only `cloud_cover` and `precipitation_rate` influence confidence; the
/// remaining fields are carried into run metadata unchanged. Field names on
/// disk follow the reanalysis-style stub record (`tcc`, `precip`, ...), and
/// absent fields read as `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSample {
    /// Total cloud cover fraction in `[0, 1]`
    #[serde(rename = "tcc")]
    pub cloud_cover: f64,
    /// Precipitation rate in mm/hr
    #[serde(rename = "precip")]
    pub precipitation_rate: f64,
    /// 2 m air temperature
    #[serde(rename = "temp2m")]
    pub temperature: f64,
    /// 2 m relative humidity
    #[serde(rename = "rh2m")]
    pub humidity: f64,
    /// Surface pressure
    pub pressure: f64,
}

impl WeatherSample {
    /// Clear skies, no precipitation
    pub fn clear_sky() -> Self {
        Self::default()
    }

    /// Sample with the two fields that drive confidence
    pub fn with_conditions(cloud_cover: f64, precipitation_rate: f64) -> Self {
        Self {
            cloud_cover,
            precipitation_rate,
            ..Self::default()
        }
    }

    /// Whether the confidence-driving fields are inside their physical ranges
    pub fn is_physical(&self) -> bool {
        (0.0..=1.0).contains(&self.cloud_cover) && self.precipitation_rate >= 0.0
    }
}
