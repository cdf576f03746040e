//! Sequential triple loop vs. the worker pool across a few square sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use matmul_pool::{Matrix, multiply, multiply_sequential};
use rand::{SeedableRng, rngs::StdRng};

fn matmul_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for size in [32, 128, 256] {
        let a = Matrix::random(size, size, 1..=100, &mut rng);
        let b = Matrix::random(size, size, 1..=100, &mut rng);
        group.throughput(Throughput::Elements((size * size * size) as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &(&a, &b), |bench, (a, b)| {
            bench.iter(|| black_box(multiply_sequential(black_box(a), black_box(b)).unwrap()));
        });

        for threads in [1, 2, 4, 8] {
            let id = BenchmarkId::new(format!("pool_{threads}"), size);
            group.bench_with_input(id, &(&a, &b), |bench, (a, b)| {
                bench.iter(|| black_box(multiply(black_box(a), black_box(b), threads).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, matmul_benchmark);
criterion_main!(benches);
