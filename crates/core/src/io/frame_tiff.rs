//! Multi-band frames as multi-page TIFF
//!
//! Each page holds one band as a single-channel image; all pages must share
//! the same dimensions. Pages are written as 32-bit float.

use crate::error::{Error, Result};
use crate::frame::Frame;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tracing::debug;

/// Read a frame from a multi-page TIFF file
pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    super::require_input(path)?;
    let file = File::open(path)?;
    let frame = decode_frame(BufReader::new(file))?;
    debug!(
        "Read {} with {} bands of {}x{}",
        path.display(),
        frame.bands(),
        frame.cols(),
        frame.rows()
    );
    Ok(frame)
}

/// Read a frame from an in-memory TIFF buffer
pub fn read_frame_from_buffer(data: &[u8]) -> Result<Frame> {
    decode_frame(Cursor::new(data))
}

/// Internal: decode every page of a TIFF from any `Read + Seek` source
fn decode_frame<R>(reader: R) -> Result<Frame>
where
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Decode(format!("TIFF decode error: {}", e)))?;

    let mut dims: Option<(u32, u32)> = None;
    let mut bands = 0usize;
    let mut data: Vec<f64> = Vec::new();

    loop {
        let page_dims = decoder
            .dimensions()
            .map_err(|e| Error::Decode(format!("Cannot read dimensions: {}", e)))?;

        match dims {
            None => dims = Some(page_dims),
            Some(expected) if expected != page_dims => {
                return Err(Error::ShapeMismatch {
                    expected: (bands + 1, expected.1 as usize, expected.0 as usize),
                    actual: (bands + 1, page_dims.1 as usize, page_dims.0 as usize),
                });
            }
            Some(_) => {}
        }

        let page = decoder
            .read_image()
            .map_err(|e| Error::Decode(format!("Cannot read band {}: {}", bands, e)))?;
        let values = page_to_f64(page)?;
        if values.len() != (page_dims.0 as usize) * (page_dims.1 as usize) {
            return Err(Error::Decode(format!(
                "Band {} is not single-channel ({} samples for {}x{})",
                bands,
                values.len(),
                page_dims.0,
                page_dims.1
            )));
        }
        data.extend(values);
        bands += 1;

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| Error::Decode(format!("Cannot advance to band {}: {}", bands, e)))?;
    }

    let (cols, rows) = dims.unwrap_or((0, 0));
    Frame::from_vec(data, bands, rows as usize, cols as usize)
}

fn page_to_f64(page: DecodingResult) -> Result<Vec<f64>> {
    let values = match page {
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        // Integer pages are taken as full-scale reflectance
        DecodingResult::U8(buf) => buf.into_iter().map(|v| f64::from(v) / 255.0).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(|v| f64::from(v) / 65535.0).collect(),
        _ => {
            return Err(Error::Decode(
                "Unsupported TIFF sample format for frame band".to_string(),
            ))
        }
    };
    Ok(values)
}

/// Write a frame to a multi-page TIFF file
pub fn write_frame<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_frame(frame, file)
}

/// Write a frame to an in-memory TIFF buffer
pub fn write_frame_to_buffer(frame: &Frame) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_frame(frame, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode one page per band into any `Write + Seek` sink
fn encode_frame<W>(frame: &Frame, writer: W) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::Encode(format!("TIFF encoder error: {}", e)))?;

    let (bands, rows, cols) = frame.shape();
    for b in 0..bands {
        let band: Vec<f32> = frame.band(b)?.iter().map(|&v| v as f32).collect();
        encoder
            .write_image::<Gray32Float>(cols as u32, rows as u32, &band)
            .map_err(|e| Error::Encode(format!("Cannot write band {}: {}", b, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_roundtrip() {
        let data: Vec<f64> = (0..3 * 4 * 5).map(|i| i as f64 / 60.0).collect();
        let frame = Frame::from_vec(data, 3, 4, 5).unwrap();

        let buf = write_frame_to_buffer(&frame).unwrap();
        let back = read_frame_from_buffer(&buf).unwrap();

        assert_eq!(back.shape(), (3, 4, 5));
        for (a, b) in frame.data().iter().zip(back.data().iter()) {
            assert!((a - b).abs() < 1e-6, "Expected {}, got {}", a, b);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = read_frame("/nonexistent/frame_00.tif").unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
    }

    #[test]
    fn test_garbage_buffer() {
        assert!(matches!(
            read_frame_from_buffer(b"not a tiff"),
            Err(Error::Decode(_))
        ));
    }
}
