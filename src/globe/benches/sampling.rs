use common::PixelCoordinate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use globe::{
    generate, nearest_index, project_coordinate, rebuild, Coordinate, GlobeConfig, ImageSize,
    PixelBuffer,
};

const COUNTS: [usize; 4] = [1_000, 8_000, 32_000, 128_000];

fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Generate");

    for count in COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| generate(black_box(count), 1.0, ImageSize::REFERENCE))
        });
    }

    group.finish();
}

fn benchmark_nearest(c: &mut Criterion) {
    let target = project_coordinate(Coordinate::new(40.7826, -73.9656), ImageSize::REFERENCE)
        .unwrap_or(PixelCoordinate::new(0, 0));

    let mut group = c.benchmark_group("Nearest");

    for count in COUNTS {
        let points = generate(count, 1.0, ImageSize::REFERENCE).unwrap();

        group.bench_with_input(BenchmarkId::new("Linear", count), &points, |b, points| {
            b.iter(|| nearest_index(black_box(target), points))
        });
    }

    group.finish();
}

fn benchmark_rebuild(c: &mut Criterion) {
    let buffer = PixelBuffer::from_fn(2048, 1024, |u, v| {
        if (u / 64 + v / 64) % 2 == 0 {
            [0, 0, 0, 255]
        } else {
            [255, 255, 255, 255]
        }
    })
    .unwrap();

    let config = GlobeConfig::default();

    c.bench_function("Rebuild default", |b| {
        b.iter(|| rebuild(black_box(&config), &buffer))
    });
}

criterion_group!(
    benches,
    benchmark_generation,
    benchmark_nearest,
    benchmark_rebuild
);
criterion_main!(benches);
