use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nalgebra::Vector3;

use xyzv::{ByteOrder, Precision, Sample, Trajectory};

fn encoded(order: ByteOrder, precision: Precision, n: usize) -> Vec<u8> {
    let samples = (0..n)
        .map(|i| {
            let t = i as f64;
            Sample::new(
                t,
                Vector3::new(t, 2.0 * t, 3.0 * t),
                Vector3::new(1.0, 2.0, 3.0),
            )
        })
        .collect();
    Trajectory::from_samples(order, precision, samples)
        .expect("ordered samples")
        .to_bytes()
}

fn bench_decode(c: &mut Criterion) {
    let n = 100_000;
    let mut group = c.benchmark_group("decode_trajectory");

    for order in [ByteOrder::Little, ByteOrder::Big] {
        for precision in [Precision::Float32, Precision::Float64] {
            let bytes = encoded(order, precision, n);
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_function(format!("{order}/{precision}"), |b| {
                b.iter(|| Trajectory::load(Cursor::new(black_box(bytes.as_slice()))))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
