//! Turning score maps into detections
//!
//! - **threshold**: global quantile threshold and binary mask
//! - **confidence**: statistical separation derated by weather

mod confidence;
mod threshold;

pub use confidence::{base_confidence, estimate_confidence, weather_penalty, CONFIDENCE_EPSILON};
pub use threshold::{threshold_mask, validate_quantile, DEFAULT_QUANTILE};
