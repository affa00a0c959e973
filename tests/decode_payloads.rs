use diffrakt::{
    decode_pixels, ByteOrder, DecodeParams, DiffraktError, HeaderMap, PixelType,
};
use rand::prelude::*;
use std::io::Cursor;

fn params(
    byte_order: ByteOrder,
    pixel_type: PixelType,
    header_bytes: u64,
    width: usize,
    height: usize,
) -> DecodeParams {
    DecodeParams {
        byte_order,
        pixel_type,
        header_bytes,
        width,
        height,
    }
}

#[test]
fn u16_big_endian_decodes_exact_values() {
    let payload = [0x01, 0x02, 0xFF, 0xFE, 0x00, 0x00, 0x00, 0x01];
    let mut cursor = Cursor::new(&payload[..]);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Big, PixelType::UnsignedShort, 0, 2, 2),
    )
    .unwrap();
    assert_eq!(matrix.row(0).unwrap(), &[0x0102, 0xFFFE]);
    assert_eq!(matrix.row(1).unwrap(), &[0, 1]);
}

#[test]
fn u16_little_endian_swaps_bytes() {
    let payload = [0x01, 0x02, 0xFF, 0xFE, 0x00, 0x00, 0x00, 0x01];
    let mut cursor = Cursor::new(&payload[..]);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Little, PixelType::UnsignedShort, 0, 2, 2),
    )
    .unwrap();
    assert_eq!(matrix.row(0).unwrap(), &[0x0201, 0xFEFF]);
    assert_eq!(matrix.row(1).unwrap(), &[0, 0x0100]);
}

#[test]
fn i32_decode_preserves_sign() {
    let payload = [
        0xFF, 0xFF, 0xFF, 0xFF, // -1 either way
        0x00, 0x00, 0x00, 0x02,
    ];
    let mut cursor = Cursor::new(&payload[..]);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Big, PixelType::SignedLong, 0, 2, 1),
    )
    .unwrap();
    assert_eq!(matrix.row(0).unwrap(), &[-1, 2]);

    let mut cursor = Cursor::new(&payload[..]);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Little, PixelType::SignedLong, 0, 2, 1),
    )
    .unwrap();
    assert_eq!(matrix.row(0).unwrap(), &[-1, 0x0200_0000]);
}

#[test]
fn header_offset_is_skipped() {
    let mut payload = vec![0xABu8; 512];
    payload.extend_from_slice(&[0x00, 0x2A, 0x00, 0x07]);
    let mut cursor = Cursor::new(payload);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Big, PixelType::UnsignedShort, 512, 2, 1),
    )
    .unwrap();
    assert_eq!(matrix.row(0).unwrap(), &[42, 7]);
}

#[test]
fn truncated_last_row_names_the_row() {
    let payload = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00];
    let mut cursor = Cursor::new(&payload[..]);
    let err = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Big, PixelType::UnsignedShort, 0, 2, 2),
    )
    .err()
    .unwrap();
    assert_eq!(
        err,
        DiffraktError::TruncatedPayload {
            row: 1,
            expected: 4,
            got: 3,
        }
    );
}

#[test]
fn truncated_middle_row_names_the_row() {
    // Three declared rows, only one and a half present.
    let payload = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
    let mut cursor = Cursor::new(&payload[..]);
    let err = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Big, PixelType::UnsignedShort, 0, 2, 3),
    )
    .err()
    .unwrap();
    assert_eq!(
        err,
        DiffraktError::TruncatedPayload {
            row: 1,
            expected: 4,
            got: 2,
        }
    );
}

#[test]
fn float_and_double_fail_loudly() {
    let payload = [0u8; 64];
    for (pixel_type, name) in [(PixelType::Float, "float"), (PixelType::Double, "double")] {
        let mut cursor = Cursor::new(&payload[..]);
        let err = decode_pixels(&mut cursor, &params(ByteOrder::Big, pixel_type, 0, 2, 2))
            .err()
            .unwrap();
        assert_eq!(err, DiffraktError::UnsupportedElementType { name });
    }
}

#[test]
fn random_u16_payloads_round_trip_in_both_orders() {
    let mut rng = rand::rng();
    let values: Vec<u16> = (0..64).map(|_| rng.random()).collect();

    let mut big = Vec::with_capacity(values.len() * 2);
    let mut little = Vec::with_capacity(values.len() * 2);
    for &v in &values {
        big.extend_from_slice(&v.to_be_bytes());
        little.extend_from_slice(&v.to_le_bytes());
    }

    let expected: Vec<i32> = values.iter().map(|&v| i32::from(v)).collect();
    let mut cursor = Cursor::new(big);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Big, PixelType::UnsignedShort, 0, 8, 8),
    )
    .unwrap();
    assert_eq!(matrix.data(), expected.as_slice());

    let mut cursor = Cursor::new(little);
    let matrix = decode_pixels(
        &mut cursor,
        &params(ByteOrder::Little, PixelType::UnsignedShort, 0, 8, 8),
    )
    .unwrap();
    assert_eq!(matrix.data(), expected.as_slice());
}

#[test]
fn decode_params_come_from_the_header() {
    let text = "{\nBYTE_ORDER=little_endian;\nTYPE=Unsigned_Short;\n\
HEADER_BYTES=512;\nSIZE1=3072;\nSIZE2=3072;\n}\n";
    let header = HeaderMap::parse(Cursor::new(text)).unwrap();
    let decoded = DecodeParams::from_header(&header).unwrap();
    assert_eq!(
        decoded,
        params(ByteOrder::Little, PixelType::UnsignedShort, 512, 3072, 3072)
    );
}

#[test]
fn missing_required_key_fails_the_decode() {
    let text = "{\nBYTE_ORDER=big_endian;\nTYPE=unsigned_short;\n\
HEADER_BYTES=512;\nSIZE1=3072;\n}\n";
    let header = HeaderMap::parse(Cursor::new(text)).unwrap();
    let err = DecodeParams::from_header(&header).err().unwrap();
    assert_eq!(err, DiffraktError::MissingHeaderKey { key: "SIZE2" });
}

#[test]
fn unparsable_header_value_is_malformed() {
    let text = "{\nBYTE_ORDER=big_endian;\nTYPE=unsigned_short;\n\
HEADER_BYTES=lots;\nSIZE1=3072;\nSIZE2=3072;\n}\n";
    let header = HeaderMap::parse(Cursor::new(text)).unwrap();
    let err = DecodeParams::from_header(&header).err().unwrap();
    assert!(matches!(err, DiffraktError::MalformedHeader { .. }));
}

#[test]
fn unknown_type_name_is_malformed() {
    let text = "{\nBYTE_ORDER=big_endian;\nTYPE=mad4;\n\
HEADER_BYTES=512;\nSIZE1=64;\nSIZE2=64;\n}\n";
    let header = HeaderMap::parse(Cursor::new(text)).unwrap();
    let err = DecodeParams::from_header(&header).err().unwrap();
    assert!(matches!(err, DiffraktError::MalformedHeader { .. }));
}
