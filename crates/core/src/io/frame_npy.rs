//! Frames as NumPy `.npy` cubes
//!
//! The array must be 3-D with shape `(bands, rows, cols)` and a float
//! dtype (`<f4` or `<f8`). Fortran-ordered arrays are accepted.

use crate::error::{Error, Result};
use crate::frame::Frame;
use ndarray::Array3;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Read a frame from a `.npy` file
pub fn read_frame_npy<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    super::require_input(path)?;
    let bytes = fs::read(path)?;
    let frame = read_frame_npy_from_buffer(&bytes)?;
    debug!(
        "Read {} with {} bands of {}x{}",
        path.display(),
        frame.bands(),
        frame.cols(),
        frame.rows()
    );
    Ok(frame)
}

/// Read a frame from an in-memory `.npy` buffer
pub fn read_frame_npy_from_buffer(data: &[u8]) -> Result<Frame> {
    let cube = match Array3::<f64>::read_npy(data) {
        Ok(cube) => cube,
        Err(_) => Array3::<f32>::read_npy(data)
            .map_err(|e| Error::Decode(format!("NPY decode error: {}", e)))?
            .mapv(f64::from),
    };
    Frame::new(cube)
}

/// Write a frame as a `<f4` `.npy` cube
pub fn write_frame_npy<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    frame
        .data()
        .mapv(|v| v as f32)
        .write_npy(BufWriter::new(file))
        .map_err(|e| Error::Encode(format!("NPY encode error: {}", e)))
}
