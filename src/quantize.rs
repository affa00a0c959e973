//! Linear intensity quantization into a bounded display index range.

use crate::matrix::{Matrix, MatrixView};
use crate::trace::trace_event;
use crate::util::{DiffraktError, DiffraktResult};

/// Quantization result: the index matrix plus the recorded warning condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantized {
    /// Per-pixel indices, each in `[0, levels - 1]`.
    pub indices: Matrix<i32>,
    /// Number of input pixels below zero, floored to 0 during the scan.
    pub negative_pixels: usize,
}

/// Rescales raw intensities into `levels` display indices.
///
/// Negative inputs are background sentinels: they are floored to 0 for the
/// min/max scan (counted, never a failure) and map to index 0. The scale
/// factor is `(max - min) / levels + 1`; the divisor bias keeps the maximum
/// value strictly below `levels` and is relied on by downstream index tables.
pub fn quantize(src: MatrixView<'_, i32>, levels: usize) -> DiffraktResult<Quantized> {
    if levels == 0 {
        return Err(DiffraktError::InvalidParameter("levels must be at least 1"));
    }

    let mut min = i64::MAX;
    let mut max = i64::MIN;
    let mut negative_pixels = 0usize;
    for y in 0..src.height() {
        let row = src.row(y).expect("row within bounds");
        for &value in row {
            if value < 0 {
                negative_pixels += 1;
            }
            let floored = i64::from(value.max(0));
            min = min.min(floored);
            max = max.max(floored);
        }
    }

    let factor = (max - min) / levels as i64 + 1;
    let mut data = Vec::with_capacity(src.width() * src.height());
    for y in 0..src.height() {
        let row = src.row(y).expect("row within bounds");
        for &value in row {
            let index = if i64::from(value) < min {
                0
            } else {
                ((i64::from(value) - min) / factor) as i32
            };
            data.push(index);
        }
    }

    trace_event!("quantize_done", levels = levels, negative_pixels = negative_pixels);
    Ok(Quantized {
        indices: Matrix::new(data, src.width(), src.height())?,
        negative_pixels,
    })
}
