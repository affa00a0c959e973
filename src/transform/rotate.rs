//! Rotation with inverse-mapped resampling.

use crate::matrix::{Matrix, MatrixView};
use crate::trace::{trace_event, trace_span};
use crate::util::math::sin_cos_deg;
use crate::util::DiffraktResult;

use super::{Interpolation, Rotation};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Matrix element usable by the shared resampling core.
///
/// Integer elements are promoted to `f64` for the interpolation math and
/// rounded on write-back; real elements pass through unchanged.
trait Sample: Copy + Send + Sync {
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

impl Sample for i32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
    fn from_f64(value: f64) -> Self {
        value.round() as i32
    }
}

impl Sample for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Inverse-mapping constants shared by every output pixel.
#[derive(Clone, Copy)]
struct Mapping {
    sin_a: f64,
    cos_a: f64,
    cx: f64,
    cy: f64,
    min_x: f64,
    min_y: f64,
}

/// Rotates an integer matrix; samples are promoted to `f64` for the math and
/// rounded back on output.
pub fn rotate_i32(
    src: MatrixView<'_, i32>,
    rotation: &Rotation<i32>,
) -> DiffraktResult<Matrix<i32>> {
    rotate_any(src, rotation)
}

/// Rotates a real-valued matrix.
pub fn rotate_f64(
    src: MatrixView<'_, f64>,
    rotation: &Rotation<f64>,
) -> DiffraktResult<Matrix<f64>> {
    rotate_any(src, rotation)
}

fn rotate_any<T: Sample>(
    src: MatrixView<'_, T>,
    rotation: &Rotation<T>,
) -> DiffraktResult<Matrix<T>> {
    let width = src.width();
    let height = src.height();
    let (sin_a, cos_a) = sin_cos_deg(rotation.angle_deg);
    let (cx, cy) = rotation.center.unwrap_or((
        (width as f64 - 1.0) * 0.5,
        (height as f64 - 1.0) * 0.5,
    ));

    // Output canvas from the four rotated input corners, per axis.
    let corners = [
        (0.0, 0.0),
        (width as f64 - 1.0, 0.0),
        (0.0, height as f64 - 1.0),
        (width as f64 - 1.0, height as f64 - 1.0),
    ];
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in corners {
        let dx = x - cx;
        let dy = y - cy;
        let tx = cos_a * dx - sin_a * dy + cx;
        let ty = sin_a * dx + cos_a * dy + cy;
        min_x = min_x.min(tx);
        max_x = max_x.max(tx);
        min_y = min_y.min(ty);
        max_y = max_y.max(ty);
    }
    let out_width = (max_x - min_x).round() as usize + 1;
    let out_height = (max_y - min_y).round() as usize + 1;

    let _guard = trace_span!("rotate", out_width, out_height).entered();

    let mapping = Mapping {
        sin_a,
        cos_a,
        cx,
        cy,
        min_x,
        min_y,
    };
    let mut data = vec![rotation.background; out_width * out_height];
    fill_rows(
        &mut data,
        out_width,
        src,
        &mapping,
        rotation.interpolation,
        rotation.parallel,
    );

    trace_event!(
        "rotate_done",
        angle_deg = rotation.angle_deg,
        out_width = out_width,
        out_height = out_height
    );
    Matrix::new(data, out_width, out_height)
}

#[cfg(feature = "rayon")]
fn fill_rows<T: Sample>(
    data: &mut [T],
    out_width: usize,
    src: MatrixView<'_, T>,
    mapping: &Mapping,
    interpolation: Interpolation,
    parallel: bool,
) {
    if parallel {
        data.par_chunks_mut(out_width)
            .enumerate()
            .for_each(|(y, row)| fill_row(row, y, src, mapping, interpolation));
    } else {
        for (y, row) in data.chunks_mut(out_width).enumerate() {
            fill_row(row, y, src, mapping, interpolation);
        }
    }
}

#[cfg(not(feature = "rayon"))]
fn fill_rows<T: Sample>(
    data: &mut [T],
    out_width: usize,
    src: MatrixView<'_, T>,
    mapping: &Mapping,
    interpolation: Interpolation,
    _parallel: bool,
) {
    for (y, row) in data.chunks_mut(out_width).enumerate() {
        fill_row(row, y, src, mapping, interpolation);
    }
}

/// Resamples one output row. Rows are independent: no row reads another
/// row's output, so execution order is irrelevant.
fn fill_row<T: Sample>(
    row: &mut [T],
    y: usize,
    src: MatrixView<'_, T>,
    mapping: &Mapping,
    interpolation: Interpolation,
) {
    let yt = y as f64 + mapping.min_y - mapping.cy;
    for (x, out) in row.iter_mut().enumerate() {
        let xt = x as f64 + mapping.min_x - mapping.cx;
        let xs = mapping.cos_a * xt + mapping.sin_a * yt + mapping.cx;
        let ys = -mapping.sin_a * xt + mapping.cos_a * yt + mapping.cy;
        let sample = match interpolation {
            Interpolation::Nearest => sample_nearest(src, xs, ys),
            Interpolation::Bilinear => sample_bilinear(src, xs, ys),
        };
        // Out-of-canvas samples keep the background prefill.
        if let Some(value) = sample {
            *out = value;
        }
    }
}

/// Copies the nearest integer source pixel, if in-bounds.
fn sample_nearest<T: Copy>(src: MatrixView<'_, T>, xs: f64, ys: f64) -> Option<T> {
    if !xs.is_finite() || !ys.is_finite() {
        return None;
    }
    let xi = xs.round();
    let yi = ys.round();
    if xi < 0.0 || yi < 0.0 {
        return None;
    }
    src.get(xi as usize, yi as usize).copied()
}

/// Weighted sum over the enclosing four source pixels.
///
/// When the patch straddles the canvas edge the single nearest neighbor is
/// copied if in-bounds; otherwise the sample stays background. Edge pixels
/// are never clamped or wrapped.
fn sample_bilinear<T: Sample>(src: MatrixView<'_, T>, xs: f64, ys: f64) -> Option<T> {
    if !xs.is_finite() || !ys.is_finite() {
        return None;
    }
    let x1 = xs.floor();
    let y1 = ys.floor();
    let max_x = src.width() as f64 - 1.0;
    let max_y = src.height() as f64 - 1.0;
    if x1 >= 0.0 && y1 >= 0.0 && x1 + 1.0 <= max_x && y1 + 1.0 <= max_y {
        let fx = xs - x1;
        let fy = ys - y1;
        let xa = x1 as usize;
        let ya = y1 as usize;
        let row0 = src.row(ya).expect("row within bounds");
        let row1 = src.row(ya + 1).expect("row within bounds");
        let a = row0[xa].to_f64();
        let b = row0[xa + 1].to_f64();
        let c = row1[xa].to_f64();
        let d = row1[xa + 1].to_f64();

        let w00 = (1.0 - fx) * (1.0 - fy);
        let w10 = fx * (1.0 - fy);
        let w01 = (1.0 - fx) * fy;
        let w11 = fx * fy;
        Some(T::from_f64(a * w00 + b * w10 + c * w01 + d * w11))
    } else {
        sample_nearest(src, xs, ys)
    }
}
