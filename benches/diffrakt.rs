use criterion::{criterion_group, criterion_main, Criterion};
use diffrakt::{
    decode_pixels, rotate_i32, ByteOrder, DecodeParams, Interpolation, Matrix, PixelType, Rotation,
};
use std::hint::black_box;
use std::io::Cursor;

fn make_payload_u16_be(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 2);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFFFF) as u16;
            data.extend_from_slice(&value.to_be_bytes());
        }
    }
    data
}

fn make_matrix(width: usize, height: usize) -> Matrix<i32> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push((((x * 13) ^ (y * 7) ^ (x * y)) & 0xFFFF) as i32);
        }
    }
    Matrix::new(data, width, height).unwrap()
}

fn bench_decode(c: &mut Criterion) {
    let width = 1024;
    let height = 1024;
    let payload = make_payload_u16_be(width, height);
    let params = DecodeParams {
        byte_order: ByteOrder::Big,
        pixel_type: PixelType::UnsignedShort,
        header_bytes: 0,
        width,
        height,
    };

    c.bench_function("decode_u16_be_1024", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(payload.as_slice());
            black_box(decode_pixels(&mut cursor, &params).unwrap())
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let matrix = make_matrix(512, 512);
    let nearest = Rotation::new(12.3, -1);
    let mut bilinear = nearest;
    bilinear.interpolation = Interpolation::Bilinear;

    c.bench_function("rotate_nearest_512", |b| {
        b.iter(|| black_box(rotate_i32(matrix.view(), &nearest).unwrap()))
    });
    c.bench_function("rotate_bilinear_512", |b| {
        b.iter(|| black_box(rotate_i32(matrix.view(), &bilinear).unwrap()))
    });
}

criterion_group!(benches, bench_decode, bench_rotate);
criterion_main!(benches);
