//! Format detection and decode-path dispatch.
//!
//! Selection is by case-insensitive file extension only; no content sniffing
//! is performed beyond the header tags the chosen decoder itself reads.
//! Decoder errors pass through unchanged: a failed decode never yields a
//! substitute matrix.

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::decode::{decode_pixels, ByteOrder, DecodeParams, PixelType};
use crate::header::HeaderMap;
use crate::matrix::Matrix;
use crate::util::{DiffraktError, DiffraktResult};

#[cfg(feature = "tiff-io")]
mod tiff;

/// Decode path selected for a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatKind {
    /// Header-based family: brace-delimited text header plus binary payload.
    Smv,
    /// Headerless fixed layout: big-endian unsigned 16-bit, payload at byte 0.
    Raw,
    /// Delegated to the external TIFF decoder.
    Tiff,
}

impl FormatKind {
    /// Detects the decode path from the file extension alone.
    pub fn detect(path: &Path) -> DiffraktResult<Self> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "img" | "smv" => Ok(FormatKind::Smv),
            "raw" | "bin" => Ok(FormatKind::Raw),
            "tif" | "tiff" => Ok(FormatKind::Tiff),
            _ => Err(DiffraktError::UnsupportedFormat { extension }),
        }
    }

    /// Returns a short lowercase label for reports.
    pub fn name(self) -> &'static str {
        match self {
            FormatKind::Smv => "smv",
            FormatKind::Raw => "raw",
            FormatKind::Tiff => "tiff",
        }
    }
}

/// Loads a detector frame, routing by extension.
///
/// `raw_size` supplies the out-of-band geometry for the headerless raw
/// format; it is ignored by the other paths.
pub fn load_image<P: AsRef<Path>>(
    path: P,
    raw_size: Option<(usize, usize)>,
) -> DiffraktResult<Matrix<i32>> {
    let path = path.as_ref();
    match FormatKind::detect(path)? {
        FormatKind::Smv => load_smv(path),
        FormatKind::Raw => {
            let (width, height) = raw_size.ok_or(DiffraktError::InvalidParameter(
                "raw format requires explicit width and height",
            ))?;
            load_raw(path, width, height)
        }
        FormatKind::Tiff => load_tiff(path),
    }
}

/// Loads a header-based frame: header parse, then row-batched pixel decode
/// using the header-declared geometry.
pub fn load_smv<P: AsRef<Path>>(path: P) -> DiffraktResult<Matrix<i32>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let header = HeaderMap::parse(&mut reader)?;
    let params = DecodeParams::from_header(&header)?;
    decode_pixels(&mut reader, &params)
}

/// Loads a headerless raw frame with caller-declared geometry.
pub fn load_raw<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
) -> DiffraktResult<Matrix<i32>> {
    let mut file = File::open(path)?;
    let params = DecodeParams {
        byte_order: ByteOrder::Big,
        pixel_type: PixelType::UnsignedShort,
        header_bytes: 0,
        width,
        height,
    };
    decode_pixels(&mut file, &params)
}

#[cfg(feature = "tiff-io")]
fn load_tiff(path: &Path) -> DiffraktResult<Matrix<i32>> {
    tiff::load(path)
}

#[cfg(not(feature = "tiff-io"))]
fn load_tiff(path: &Path) -> DiffraktResult<Matrix<i32>> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_ascii_lowercase();
    Err(DiffraktError::UnsupportedFormat { extension })
}
