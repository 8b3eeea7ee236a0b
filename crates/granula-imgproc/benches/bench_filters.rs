use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use granula_image::RasterBuffer;
use granula_imgproc::border::{BorderPolicy, BorderedRaster};
use granula_imgproc::filter::{convolve, gaussian_blur, kernels::Kernel, median_filter, sobel};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Convolution");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1, 2, 3, 5].iter() {
            let kernel_size = 2 * radius + 1;
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            // input image
            let image_size = [*width, *height].into();
            let image_f32 =
                RasterBuffer::from_fn(image_size, |x, y| ((x * 31 + y * 17) % 255) as f32)
                    .unwrap();
            let image_u8 = image_f32.cast::<u8>().unwrap();

            let bordered_f32 =
                BorderedRaster::new(&image_f32, *radius, *radius, BorderPolicy::Mirror).unwrap();
            let bordered_u8 =
                BorderedRaster::new(&image_u8, *radius, *radius, BorderPolicy::Mirror).unwrap();

            let kernel = Kernel::box_kernel(*radius, *radius);

            group.bench_with_input(
                BenchmarkId::new("convolve_box_f32", &parameter_string),
                &bordered_f32,
                |b, src| b.iter(|| black_box(convolve(src, &kernel))),
            );

            group.bench_with_input(
                BenchmarkId::new("convolve_box_u8", &parameter_string),
                &bordered_u8,
                |b, src| b.iter(|| black_box(convolve(src, &kernel))),
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_separable_f32", &parameter_string),
                &bordered_f32,
                |b, src| b.iter(|| black_box(gaussian_blur(src, (*radius, *radius), (1.5, 1.5)))),
            );

            group.bench_with_input(
                BenchmarkId::new("median_u8", &parameter_string),
                &bordered_u8,
                |b, src| b.iter(|| black_box(median_filter(src, (*radius, *radius)))),
            );
        }
    }
    group.finish();

    let mut group = c.benchmark_group("Sobel");
    for (width, height) in [(256, 224), (512, 448)].iter() {
        let image = RasterBuffer::from_size_val([*width, *height].into(), 10u16).unwrap();
        let bordered = BorderedRaster::new(&image, 1, 1, BorderPolicy::Copy).unwrap();
        group.bench_with_input(
            BenchmarkId::new("sobel_u16", format!("{}x{}", width, height)),
            &bordered,
            |b, src| b.iter(|| black_box(sobel(src))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
