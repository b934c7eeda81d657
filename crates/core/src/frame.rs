//! Multi-band frames

use crate::error::{Error, Result};
use ndarray::{Array2, Array3, ArrayView2, Axis};

/// One time-step of multi-band spatial data.
///
/// Stored as a `(bands, rows, cols)` cube. Values are expected in `[0, 1]`
/// but are not clamped; scorers operate on whatever the loader supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Array3<f64>,
}

impl Frame {
    /// Wrap a `(bands, rows, cols)` cube. Every dimension must be non-zero.
    pub fn new(data: Array3<f64>) -> Result<Self> {
        let (bands, rows, cols) = data.dim();
        if bands == 0 || rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { bands, rows, cols });
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Build a frame from band-major data
    pub fn from_vec(data: Vec<f64>, bands: usize, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != bands * rows * cols {
            return Err(Error::InvalidDimensions { bands, rows, cols });
        }
        let cube = Array3::from_shape_vec((bands, rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        Self::new(cube)
    }

    /// A frame with every cell set to `value`
    pub fn filled(bands: usize, rows: usize, cols: usize, value: f64) -> Result<Self> {
        Self::new(Array3::from_elem((bands, rows, cols), value))
    }

    /// Number of spectral bands
    pub fn bands(&self) -> usize {
        self.data.dim().0
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.dim().1
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.dim().2
    }

    /// Dimensions as (bands, rows, cols)
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of spatial samples (rows * cols)
    pub fn pixel_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// View of a single band
    pub fn band(&self, index: usize) -> Result<ArrayView2<'_, f64>> {
        if index >= self.bands() {
            return Err(Error::IndexOutOfBounds {
                row: index,
                col: 0,
                rows: self.bands(),
                cols: 0,
            });
        }
        Ok(self.data.index_axis(Axis(0), index))
    }

    /// Per-pixel mean across bands, shape (rows, cols)
    pub fn band_mean(&self) -> Array2<f64> {
        let sum = self.data.sum_axis(Axis(0));
        sum / self.bands() as f64
    }

    /// All pixels as columns of a `(bands, rows * cols)` matrix
    pub fn band_samples(&self) -> Result<ArrayView2<'_, f64>> {
        let (bands, rows, cols) = self.shape();
        self.data
            .view()
            .into_shape_with_order((bands, rows * cols))
            .map_err(|e| Error::Other(e.to_string()))
    }

    /// Underlying cube
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }
}
