//! Intensity matrices and borrowed views.
//!
//! `Matrix` is an owned, rectangular, row-major buffer; every decode and
//! transform stage returns a freshly owned `Matrix` rather than mutating its
//! input. `MatrixView` is a borrowed 2D view into a 1D buffer with an explicit
//! stride. The stride counts elements between the starts of consecutive rows,
//! so a stride larger than the width represents padded rows.

use crate::util::{DiffraktError, DiffraktResult};

/// Borrowed 2D matrix view with an explicit stride.
#[derive(Copy, Clone)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> MatrixView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> DiffraktResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> DiffraktResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(DiffraktError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

/// Owned rectangular matrix in contiguous row-major layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Matrix<T> {
    /// Creates a matrix from a contiguous buffer of exactly `width * height`
    /// elements.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> DiffraktResult<Self> {
        if width == 0 || height == 0 {
            return Err(DiffraktError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(DiffraktError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(DiffraktError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(DiffraktError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a matrix with every element set to `value`.
    pub fn filled(value: T, width: usize, height: usize) -> DiffraktResult<Self>
    where
        T: Clone,
    {
        if width == 0 || height == 0 {
            return Err(DiffraktError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(DiffraktError::InvalidDimensions { width, height })?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
        })
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the backing row-major slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the matrix and returns its backing buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Returns a contiguous slice for row `y`.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get_mut(start..start + self.width)
    }

    /// Returns a borrowed view of the full matrix.
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> DiffraktResult<usize> {
    if width == 0 || height == 0 {
        return Err(DiffraktError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(DiffraktError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(DiffraktError::InvalidDimensions { width, height })?;
    Ok(needed)
}
