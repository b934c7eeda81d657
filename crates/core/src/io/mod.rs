//! Reading inputs and persisting run artifacts
//!
//! - Frames: NumPy `.npy` cubes, or multi-page float TIFF with one page per band
//! - Weather: JSON stub record
//! - Artifacts: grayscale PNG score maps and masks, JSON run metadata

mod artifact;
mod frame_npy;
mod frame_tiff;
mod weather_json;

pub use artifact::{quantize_mask, quantize_score, ArtifactWriter, RunArtifacts};
pub use frame_npy::{read_frame_npy, read_frame_npy_from_buffer, write_frame_npy};
pub use frame_tiff::{read_frame, read_frame_from_buffer, write_frame, write_frame_to_buffer};
pub use weather_json::read_weather;

use crate::error::{Error, Result};
use crate::frame::Frame;
use std::path::{Path, PathBuf};

/// Frame file extensions in lookup order
pub const FRAME_EXTENSIONS: [&str; 2] = ["npy", "tif"];

/// Path of frame `stem` inside `dir`, trying each of [`FRAME_EXTENSIONS`].
///
/// Fails with `MissingInput` naming the preferred `.npy` path when no
/// candidate exists.
pub fn locate_frame(dir: &Path, stem: &str) -> Result<PathBuf> {
    let candidates: Vec<PathBuf> = FRAME_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .collect();
    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(Error::MissingInput {
            path: candidates[0].clone(),
        }),
    }
}

/// Read a frame, picking the decoder from the file extension
pub fn read_frame_file<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "npy" => read_frame_npy(path),
        "tif" | "tiff" => read_frame(path),
        _ => Err(Error::Decode(format!(
            "Unsupported frame format: {}",
            path.display()
        ))),
    }
}

/// Fail with `MissingInput` when a required input file does not exist
pub(crate) fn require_input(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingInput {
            path: path.to_path_buf(),
        })
    }
}
