//! TIFF decoding via the `image` crate.
//!
//! Available when the `tiff-io` feature is enabled. The decoder is treated as
//! an opaque collaborator: it either produces a rectangular frame or fails.

use std::path::Path;

use crate::matrix::Matrix;
use crate::util::{DiffraktError, DiffraktResult};

/// Loads a TIFF frame and widens it to a signed intensity matrix.
pub(crate) fn load(path: &Path) -> DiffraktResult<Matrix<i32>> {
    let img = image::open(path).map_err(|err| DiffraktError::TiffIo {
        reason: err.to_string(),
    })?;
    let gray = img.to_luma16();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let data = gray.as_raw().iter().map(|&v| i32::from(v)).collect();
    Matrix::new(data, width, height)
}
