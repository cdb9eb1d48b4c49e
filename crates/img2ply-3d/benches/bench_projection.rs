use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use img2ply_3d::io::ply::{write_ply_to, Encoding};
use img2ply_3d::pointcloud::PointCloud;
use img2ply_3d::projection::{project_images, BoundingBox, ConversionParams};
use img2ply_image::Image;

// checkerboard of opaque and transparent pixels so the alpha filter does some work
fn make_slices(size: usize, count: usize) -> Vec<Image<u8, 4>> {
    (0..count)
        .map(|k| {
            let data = (0..size * size)
                .flat_map(|i| {
                    let alpha = if (i + k) % 2 == 0 { 255 } else { 0 };
                    [(i % 256) as u8, k as u8, 128, alpha]
                })
                .collect();
            Image::new([size, size].into(), data).unwrap()
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_images");
    let bbox = BoundingBox::new(15.0, 10.0, 15.0).unwrap();

    for size in [64, 256].iter() {
        let slices = make_slices(*size, 16);
        let id = format!("{}x{}x16", size, size);

        group.bench_with_input(BenchmarkId::new("all_pixels", &id), &slices, |b, s| {
            b.iter(|| project_images(black_box(s), bbox, ConversionParams::default()))
        });

        let params = ConversionParams::default().with_samples(32, 0);
        group.bench_with_input(BenchmarkId::new("subsampled", &id), &slices, |b, s| {
            b.iter(|| project_images(black_box(s), bbox, params))
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_ply");
    let mut cloud = PointCloud::with_capacity(100_000, false);
    for i in 0..100_000 {
        let v = i as f64 * 1e-3;
        cloud.push([v, v * 0.5, v * 0.25], [(i % 256) as u8, 0, 255, 255]);
    }

    for encoding in [Encoding::Ascii, Encoding::BinaryLittleEndian] {
        group.bench_with_input(
            BenchmarkId::new("encoding", encoding),
            &cloud,
            |b, cloud| {
                b.iter(|| {
                    let mut buffer = Vec::with_capacity(4 << 20);
                    write_ply_to(&mut buffer, black_box(cloud), encoding).unwrap();
                    buffer
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_projection, bench_write);
criterion_main!(benches);
