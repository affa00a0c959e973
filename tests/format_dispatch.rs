use diffrakt::{load_image, DiffraktError, FormatKind};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("diffrakt-{}-{}", std::process::id(), name))
}

/// Builds a header-based file: padded text header plus big-endian u16 payload.
fn write_smv(path: &Path, width: usize, height: usize, values: &[u16], header_bytes: usize) {
    let header = format!(
        "{{\nHEADER_BYTES={header_bytes};\nDIM=2;\nBYTE_ORDER=big_endian;\n\
TYPE=unsigned_short;\nSIZE1={width};\nSIZE2={height};\n}}\n"
    );
    assert!(header.len() <= header_bytes);
    let mut bytes = header.into_bytes();
    bytes.resize(header_bytes, b' ');
    for &v in values {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    fs::write(path, bytes).unwrap();
}

#[test]
fn detection_is_by_case_insensitive_extension() {
    assert_eq!(
        FormatKind::detect(Path::new("frame_0001.IMG")).unwrap(),
        FormatKind::Smv
    );
    assert_eq!(
        FormatKind::detect(Path::new("frame.smv")).unwrap(),
        FormatKind::Smv
    );
    assert_eq!(
        FormatKind::detect(Path::new("scan.Tif")).unwrap(),
        FormatKind::Tiff
    );
    assert_eq!(
        FormatKind::detect(Path::new("scan.TIFF")).unwrap(),
        FormatKind::Tiff
    );
    assert_eq!(
        FormatKind::detect(Path::new("det.raw")).unwrap(),
        FormatKind::Raw
    );
    assert_eq!(
        FormatKind::detect(Path::new("det.BIN")).unwrap(),
        FormatKind::Raw
    );
}

#[test]
fn unknown_extensions_are_rejected_not_guessed() {
    let err = FormatKind::detect(Path::new("frame.png")).err().unwrap();
    assert_eq!(
        err,
        DiffraktError::UnsupportedFormat {
            extension: "png".to_string(),
        }
    );

    let err = FormatKind::detect(Path::new("noextension")).err().unwrap();
    assert_eq!(
        err,
        DiffraktError::UnsupportedFormat {
            extension: String::new(),
        }
    );
}

#[test]
fn smv_files_decode_end_to_end() {
    let path = temp_path("smv-roundtrip.img");
    write_smv(&path, 3, 2, &[10, 20, 30, 40, 50, 60], 512);

    let matrix = load_image(&path, None).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!((matrix.width(), matrix.height()), (3, 2));
    assert_eq!(matrix.row(0).unwrap(), &[10, 20, 30]);
    assert_eq!(matrix.row(1).unwrap(), &[40, 50, 60]);
}

#[test]
fn truncated_smv_payload_surfaces_unchanged() {
    let path = temp_path("smv-truncated.img");
    // Header declares 3 rows but only 2 are present.
    write_smv(&path, 2, 3, &[1, 2, 3, 4], 512);

    let err = load_image(&path, None).err().unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(
        err,
        DiffraktError::TruncatedPayload {
            row: 2,
            expected: 4,
            got: 0,
        }
    );
}

#[test]
fn raw_files_use_caller_geometry() {
    let path = temp_path("raw-frame.raw");
    let values: [u16; 4] = [1000, 2000, 3000, 4000];
    let mut bytes = Vec::new();
    for v in values {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    fs::write(&path, bytes).unwrap();

    let matrix = load_image(&path, Some((2, 2))).unwrap();
    let missing = load_image(&path, None);
    let _ = fs::remove_file(&path);

    assert_eq!(matrix.row(0).unwrap(), &[1000, 2000]);
    assert_eq!(matrix.row(1).unwrap(), &[3000, 4000]);
    assert_eq!(
        missing.err().unwrap(),
        DiffraktError::InvalidParameter("raw format requires explicit width and height"),
    );
}

#[test]
fn missing_file_surfaces_not_found() {
    let err = load_image(temp_path("does-not-exist.img"), None)
        .err()
        .unwrap();
    match err {
        DiffraktError::Io { kind, .. } => assert_eq!(kind, ErrorKind::NotFound),
        other => panic!("expected Io error, got {other:?}"),
    }
}
