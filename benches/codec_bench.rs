// In imgcol-core/benches/codec_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array3;
use rand::Rng;

use imgcol::codec::encode::{encode_jpeg, encode_png};
use imgcol::codec::{decode_image, JPEG_QUALITY};
use imgcol::preview::create_thumbnail;
use imgcol::{ImageDType, PixelArray};

// --- Mock Image Generation ---

const HEIGHT: usize = 480;
const WIDTH: usize = 640;

/// A smooth gradient: compresses well, like most natural photos.
fn generate_gradient_image() -> PixelArray {
    PixelArray::from(Array3::<u8>::from_shape_fn((HEIGHT, WIDTH, 3), |(y, x, c)| {
        ((x + y + c * 50) % 256) as u8
    }))
}

/// Uniform noise: the worst case for both encoders.
fn generate_noise_image() -> PixelArray {
    let mut rng = rand::rng();
    PixelArray::from(Array3::<u8>::from_shape_simple_fn((HEIGHT, WIDTH, 3), || {
        rng.random::<u8>()
    }))
}

// --- Benchmark Suite ---

fn bench_codecs(c: &mut Criterion) {
    let gradient = generate_gradient_image();
    let noise = generate_noise_image();

    // Encode once up front so decoding is measured on its own.
    let gradient_png = encode_png(&gradient).unwrap();
    let gradient_jpeg = encode_jpeg(&gradient, JPEG_QUALITY).unwrap();
    let noise_png = encode_png(&noise).unwrap();

    let mut group = c.benchmark_group("Image Codecs");
    group.throughput(criterion::Throughput::Bytes((HEIGHT * WIDTH * 3) as u64));

    group.bench_function("Encode PNG (Gradient)", |b| {
        b.iter(|| black_box(encode_png(black_box(&gradient))))
    });
    group.bench_function("Encode PNG (Noise)", |b| {
        b.iter(|| black_box(encode_png(black_box(&noise))))
    });
    group.bench_function("Encode JPEG (Gradient)", |b| {
        b.iter(|| black_box(encode_jpeg(black_box(&gradient), JPEG_QUALITY)))
    });

    group.bench_function("Decode PNG (Gradient)", |b| {
        b.iter(|| black_box(decode_image(black_box(&gradient_png), 3, ImageDType::UInt8)))
    });
    group.bench_function("Decode PNG (Noise)", |b| {
        b.iter(|| black_box(decode_image(black_box(&noise_png), 3, ImageDType::UInt8)))
    });
    group.bench_function("Decode JPEG (Gradient)", |b| {
        b.iter(|| black_box(decode_image(black_box(&gradient_jpeg), 3, ImageDType::UInt8)))
    });

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let gradient = generate_gradient_image();

    let mut group = c.benchmark_group("Preview");
    group.bench_function("Thumbnail 640x480 -> 128", |b| {
        b.iter(|| black_box(create_thumbnail(black_box(&gradient), false, 128)))
    });
    group.finish();
}

criterion_group!(benches, bench_codecs, bench_preview);
criterion_main!(benches);
