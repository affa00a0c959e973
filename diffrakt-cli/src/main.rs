use clap::{Parser, ValueEnum};
use diffrakt::{load_image, quantize, rotate_i32, FormatKind, Interpolation, Matrix, Rotation};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode and rectify area-detector frames")]
struct Cli {
    /// Input frame (.img/.smv, .raw/.bin, .tif/.tiff).
    input: PathBuf,
    /// Geometry for headerless raw frames, e.g. 3072x3072.
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    raw_size: Option<(usize, usize)>,
    /// Rotate the frame by this many degrees before reporting.
    #[arg(long, value_name = "DEG")]
    rotate: Option<f64>,
    /// Rotation center; defaults to the frame midpoint.
    #[arg(long, value_name = "X,Y", value_parser = parse_center)]
    center: Option<(f64, f64)>,
    /// Background fill for pixels outside the rotated footprint.
    #[arg(long, default_value_t = 0)]
    background: i32,
    /// Interpolation mode for --rotate.
    #[arg(long, value_enum, default_value_t = InterpArg::Nearest)]
    interp: InterpArg,
    /// Compute rotated rows in parallel (requires the rayon feature).
    #[arg(long)]
    parallel: bool,
    /// Quantize intensities into this many display levels.
    #[arg(long, value_name = "N")]
    levels: Option<usize>,
    /// Write the quantized frame as an 8-bit PGM (needs --levels of 256 or fewer).
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InterpArg {
    Nearest,
    Bilinear,
}

impl From<InterpArg> for Interpolation {
    fn from(value: InterpArg) -> Self {
        match value {
            InterpArg::Nearest => Interpolation::Nearest,
            InterpArg::Bilinear => Interpolation::Bilinear,
        }
    }
}

fn parse_size(value: &str) -> Result<(usize, usize), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {value:?}"))?;
    let width = w.trim().parse().map_err(|_| format!("bad width {w:?}"))?;
    let height = h.trim().parse().map_err(|_| format!("bad height {h:?}"))?;
    Ok((width, height))
}

fn parse_center(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {value:?}"))?;
    let x0 = x.trim().parse().map_err(|_| format!("bad x {x:?}"))?;
    let y0 = y.trim().parse().map_err(|_| format!("bad y {y:?}"))?;
    Ok((x0, y0))
}

#[derive(Debug, Serialize)]
struct RotatedSummary {
    angle_deg: f64,
    width: usize,
    height: usize,
}

#[derive(Debug, Serialize)]
struct QuantizedSummary {
    levels: usize,
    negative_pixels: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    path: String,
    format: &'static str,
    width: usize,
    height: usize,
    min: i32,
    max: i32,
    rotated: Option<RotatedSummary>,
    quantized: Option<QuantizedSummary>,
}

fn write_pgm(path: &Path, indices: &Matrix<i32>, levels: usize) -> std::io::Result<()> {
    let scale = if levels > 1 {
        255.0 / (levels as f64 - 1.0)
    } else {
        0.0
    };
    let mut bytes = format!("P5\n{} {}\n255\n", indices.width(), indices.height()).into_bytes();
    bytes.extend(indices.data().iter().map(|&i| (i as f64 * scale).round() as u8));
    fs::write(path, bytes)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("diffrakt=info".parse()?))
            .with_target(false)
            .init();
    }
    if cli.out.is_some() {
        match cli.levels {
            Some(levels) if levels <= 256 => {}
            Some(_) => return Err("--out needs --levels of 256 or fewer".into()),
            None => return Err("--out requires --levels".into()),
        }
    }

    let format = FormatKind::detect(&cli.input)?;
    let decoded = load_image(&cli.input, cli.raw_size)?;
    tracing::info!(
        path = %cli.input.display(),
        width = decoded.width(),
        height = decoded.height(),
        "frame decoded"
    );

    let (decoded_width, decoded_height) = (decoded.width(), decoded.height());
    let frame = match cli.rotate {
        Some(angle_deg) => {
            let rotation = Rotation {
                angle_deg,
                center: cli.center,
                background: cli.background,
                interpolation: cli.interp.into(),
                parallel: cli.parallel,
            };
            rotate_i32(decoded.view(), &rotation)?
        }
        None => decoded,
    };

    let quantized = match cli.levels {
        Some(levels) => Some((levels, quantize(frame.view(), levels)?)),
        None => None,
    };
    if let (Some(out), Some((levels, quant))) = (&cli.out, &quantized) {
        write_pgm(out, &quant.indices, *levels)?;
    }

    let min = frame.data().iter().copied().min().unwrap_or(0);
    let max = frame.data().iter().copied().max().unwrap_or(0);
    let summary = Summary {
        path: cli.input.display().to_string(),
        format: format.name(),
        width: decoded_width,
        height: decoded_height,
        min,
        max,
        rotated: cli.rotate.map(|angle_deg| RotatedSummary {
            angle_deg,
            width: frame.width(),
            height: frame.height(),
        }),
        quantized: quantized.as_ref().map(|(levels, quant)| QuantizedSummary {
            levels: *levels,
            negative_pixels: quant.negative_pixels,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
