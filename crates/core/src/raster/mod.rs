//! Two-dimensional grids: score maps and detection masks

mod element;
mod grid;

pub use element::RasterElement;
pub use grid::{Raster, RasterStatistics};

/// Normalized anomaly/change score per cell, in `[0, 1]`.
pub type ScoreMap = Raster<f64>;

/// Binary detection mask, `1` for detections and `0` elsewhere.
pub type Mask = Raster<u8>;
