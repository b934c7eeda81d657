//! Persisting score maps, masks and run metadata
//!
//! Layout inside the output directory, per algorithm `name`:
//! `change_<name>.png`, `detections_<name>.png`, `meta_<name>.json`.
//! The generic alias (`change.png`, `detections.png`, `meta.json`) is a
//! byte copy of one run's files.

use crate::error::{Error, Result};
use crate::metadata::RunMetadata;
use crate::raster::{Mask, ScoreMap};
use image::{GrayImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Linear `[0, 1] -> [0, 255]` quantization, truncating toward zero
pub fn quantize_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Mask cells become 0 or 255
pub fn quantize_mask(value: u8) -> u8 {
    if value > 0 {
        255
    } else {
        0
    }
}

/// Paths of the three files written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArtifacts {
    pub score_map: PathBuf,
    pub mask: PathBuf,
    pub metadata: PathBuf,
}

/// Writes run artifacts into one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create the output directory (and parents) if needed
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }

    /// Output directory
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Persist score map, mask and metadata for the run named `name`
    pub fn write_run(
        &self,
        name: &str,
        score_map: &ScoreMap,
        mask: &Mask,
        metadata: &RunMetadata,
    ) -> Result<RunArtifacts> {
        let artifacts = RunArtifacts {
            score_map: self.out_dir.join(format!("change_{}.png", name)),
            mask: self.out_dir.join(format!("detections_{}.png", name)),
            metadata: self.out_dir.join(format!("meta_{}.json", name)),
        };

        write_score_map(score_map, &artifacts.score_map)?;
        write_mask(mask, &artifacts.mask)?;
        write_metadata(metadata, &artifacts.metadata)?;

        debug!("Wrote artifacts for {} to {}", name, self.out_dir.display());
        Ok(artifacts)
    }

    /// Copy one run's files to the generic names
    pub fn write_alias(&self, source: &RunArtifacts) -> Result<RunArtifacts> {
        let alias = RunArtifacts {
            score_map: self.out_dir.join("change.png"),
            mask: self.out_dir.join("detections.png"),
            metadata: self.out_dir.join("meta.json"),
        };

        fs::copy(&source.score_map, &alias.score_map)?;
        fs::copy(&source.mask, &alias.mask)?;
        fs::copy(&source.metadata, &alias.metadata)?;

        info!(
            "Generic outputs alias {}",
            source.metadata.file_name().map_or_else(
                || source.metadata.display().to_string(),
                |n| n.to_string_lossy().into_owned()
            )
        );
        Ok(alias)
    }
}

/// Write a score map as an 8-bit grayscale PNG
pub fn write_score_map<P: AsRef<Path>>(score_map: &ScoreMap, path: P) -> Result<()> {
    let bytes: Vec<u8> = score_map.values().map(quantize_score).collect();
    write_gray_png(bytes, score_map.rows(), score_map.cols(), path.as_ref())
}

/// Write a mask as a binary (0/255) grayscale PNG
pub fn write_mask<P: AsRef<Path>>(mask: &Mask, path: P) -> Result<()> {
    let bytes: Vec<u8> = mask.values().map(quantize_mask).collect();
    write_gray_png(bytes, mask.rows(), mask.cols(), path.as_ref())
}

/// Write run metadata as pretty-printed JSON
pub fn write_metadata<P: AsRef<Path>>(metadata: &RunMetadata, path: P) -> Result<()> {
    let text = serde_json::to_string_pretty(metadata)?;
    fs::write(path.as_ref(), text)?;
    Ok(())
}

fn write_gray_png(bytes: Vec<u8>, rows: usize, cols: usize, path: &Path) -> Result<()> {
    let image = GrayImage::from_raw(cols as u32, rows as u32, bytes).ok_or_else(|| {
        Error::Encode(format!("Buffer does not match {}x{} image", cols, rows))
    })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| Error::Encode(format!("Cannot write {}: {}", path.display(), e)))
}
