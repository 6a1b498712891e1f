//! Benchmarks for the I444 to UYVY converter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndi_video::{convert_i444_to_uyvy, convert_i444_to_uyvy_par, ConversionBuffer};

fn bench_i444_to_uyvy(c: &mut Criterion) {
    let mut group = c.benchmark_group("i444_to_uyvy");

    for &(width, height) in [(1280u32, 720u32), (1920, 1080), (3840, 2160)].iter() {
        let plane_len = (width * height) as usize;
        let y: Vec<u8> = (0..plane_len).map(|i| (i % 251) as u8).collect();
        let u: Vec<u8> = (0..plane_len).map(|i| (i % 241) as u8).collect();
        let v: Vec<u8> = (0..plane_len).map(|i| (i % 239) as u8).collect();
        let mut buffer = ConversionBuffer::for_uyvy(width, height).unwrap();
        let linesize = buffer.linesize();
        let id = format!("{}x{}", width, height);

        group.bench_with_input(BenchmarkId::new("sequential", &id), &height, |b, &h| {
            b.iter(|| {
                convert_i444_to_uyvy(
                    [&y, &u, &v],
                    [width; 3],
                    0,
                    h,
                    buffer.as_mut_slice(),
                    linesize,
                );
                black_box(buffer.as_slice()[0]);
            });
        });

        group.bench_with_input(BenchmarkId::new("row_bands", &id), &height, |b, &h| {
            b.iter(|| {
                convert_i444_to_uyvy_par(
                    [&y, &u, &v],
                    [width; 3],
                    0,
                    h,
                    buffer.as_mut_slice(),
                    linesize,
                );
                black_box(buffer.as_slice()[0]);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_i444_to_uyvy);
criterion_main!(benches);
