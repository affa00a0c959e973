//! Geometric rectification of intensity matrices.
//!
//! Rotation about an arbitrary center with a dynamically sized output canvas.
//! Each call returns a freshly owned matrix whose dimensions are computed from
//! the rotated corners of the input; callers must not assume output size
//! equals input size.

mod rotate;

pub use rotate::{rotate_f64, rotate_i32};

/// Resampling mode for inverse-mapped source coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Round to the nearest integer source pixel.
    #[default]
    Nearest,
    /// Weighted average of the enclosing four source pixels.
    Bilinear,
}

/// Rotation parameters. Immutable value; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation<T> {
    /// Rotation angle in degrees, counterclockwise in matrix coordinates.
    pub angle_deg: f64,
    /// Rotation center; defaults to `((w-1)/2, (h-1)/2)` when `None`.
    pub center: Option<(f64, f64)>,
    /// Value assigned to output pixels with no in-bounds source sample.
    pub background: T,
    pub interpolation: Interpolation,
    /// Compute output rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl<T> Rotation<T> {
    /// Creates a nearest-neighbor rotation about the default center.
    pub fn new(angle_deg: f64, background: T) -> Self {
        Self {
            angle_deg,
            center: None,
            background,
            interpolation: Interpolation::Nearest,
            parallel: false,
        }
    }
}
