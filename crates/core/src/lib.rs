//! # Satyadrishti Core
//!
//! Core types and I/O for multi-band anomaly and change detection.
//!
//! This crate provides:
//! - `Frame`: an immutable `(bands, rows, cols)` cube for one time-step
//! - `Raster<T>`: 2D grid, used as `ScoreMap` (`f64`) and `Mask` (`u8`)
//! - `WeatherSample`: sensing conditions that derate confidence
//! - `ConfidenceResult` / `RunMetadata`: per-run outputs
//! - I/O: frame and weather loaders, the artifact writer

pub mod error;
pub mod frame;
pub mod io;
pub mod metadata;
pub mod raster;
pub mod weather;

pub use error::{Error, Result};
pub use frame::Frame;
pub use metadata::{ConfidenceResult, RunMetadata};
pub use raster::{Mask, Raster, RasterElement, ScoreMap};
pub use weather::WeatherSample;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::frame::Frame;
    pub use crate::metadata::{ConfidenceResult, RunMetadata};
    pub use crate::raster::{Mask, Raster, RasterElement, ScoreMap};
    pub use crate::weather::WeatherSample;
}
