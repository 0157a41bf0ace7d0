//! Population count benchmarks
//!
//! Compares the word-at-a-time counter against the byte-at-a-time reference
//! on buffers the size of typical memdiff files.
//!
//! ## Running
//!
//! ```bash
//! cargo bench --bench popcount
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memxamine::{count_set_bits, count_set_bits_bytewise};

/// Fixed pattern so runs are comparable.
fn buffer(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i.wrapping_mul(31) ^ (i >> 3)) as u8)
        .collect()
}

fn popcount_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("popcount");

    for &len in &[4 * 1024, 1024 * 1024, 16 * 1024 * 1024] {
        let data = buffer(len);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("wordwise", len), &data, |b, data| {
            b.iter(|| count_set_bits(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("bytewise", len), &data, |b, data| {
            b.iter(|| count_set_bits_bytewise(black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, popcount_benchmarks);
criterion_main!(benches);
