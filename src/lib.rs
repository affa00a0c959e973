//! Diffrakt ingests raw area-detector diffraction frames stored in
//! heterogeneous binary formats and prepares them for quantitative analysis.
//!
//! The crate covers vendor header parsing, byte-order and element-type aware
//! pixel decoding into a uniform intensity matrix, geometric rectification
//! (rotation about an arbitrary center with sub-pixel interpolation), and
//! linear intensity quantization for display index tables. Optional row
//! parallelism is available via the `rayon` feature; TIFF input via `tiff-io`.

pub mod decode;
pub mod format;
pub mod header;
pub mod matrix;
pub mod quantize;
pub(crate) mod trace;
pub mod transform;
pub mod util;

pub use decode::{decode_pixels, ByteOrder, DecodeParams, PixelType};
pub use format::{load_image, load_raw, load_smv, FormatKind};
pub use header::HeaderMap;
pub use matrix::{Matrix, MatrixView};
pub use quantize::{quantize, Quantized};
pub use transform::{rotate_f64, rotate_i32, Interpolation, Rotation};
pub use util::{DiffraktError, DiffraktResult};
