use criterion::{criterion_group, criterion_main, Criterion};
use granula_image::{ops, ImageSize, RasterBuffer};
use std::hint::black_box;

fn sample_image() -> RasterBuffer<u8> {
    RasterBuffer::from_size_val(
        ImageSize {
            width: 1920,
            height: 1080,
        },
        127,
    )
    .unwrap()
}

fn bench_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("Image");

    group.bench_function("cast_and_scale_f32", |b| {
        let image = sample_image();
        let mut dst = RasterBuffer::from_size_val(image.size(), 0.0f32).unwrap();
        b.iter(|| ops::cast_and_scale(black_box(&image), &mut dst, 1.0f32 / 255.0f32).unwrap())
    });

    group.bench_function("cast_and_scale_f64", |b| {
        let image = sample_image();
        let mut dst = RasterBuffer::from_size_val(image.size(), 0.0f64).unwrap();
        b.iter(|| ops::cast_and_scale(black_box(&image), &mut dst, 1.0f64 / 255.0f64).unwrap())
    });

    group.bench_function("cast_i32", |b| {
        let image = sample_image();
        b.iter(|| black_box(&image).cast::<i32>().unwrap())
    });

    group.bench_function("binarize", |b| {
        let image = sample_image();
        b.iter(|| ops::binarize(black_box(&image), 255u8).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_image);
criterion_main!(benches);
