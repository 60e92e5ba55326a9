use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ripchunk::{ParallelReader, ReaderConfig};
use std::sync::atomic::{AtomicU64, Ordering};

/// Newline-delimited records of varying length.
fn make_lines(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size + 64);
    let mut i = 0usize;
    while data.len() < size {
        let len = 16 + (i * 7) % 48;
        data.extend((0..len).map(|j| b'a' + ((i + j) % 26) as u8));
        data.push(b'\n');
        i += 1;
    }
    data
}

fn bench_boundary(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary");
    let size = 8 * 1024 * 1024;
    let data = make_lines(size);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for concurrency in [1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("count_lines", concurrency),
            &concurrency,
            |b, &concurrency| {
                let config = ReaderConfig::default().with_concurrency(concurrency);
                let reader = ParallelReader::new(config);
                b.iter(|| {
                    let lines = AtomicU64::new(0);
                    reader
                        .read(black_box(&data[..]), |chunk| {
                            let n = memchr::memchr_iter(b'\n', chunk).count();
                            lines.fetch_add(n as u64, Ordering::Relaxed);
                        })
                        .unwrap();
                    black_box(lines.into_inner())
                });
            },
        );
    }

    group.finish();
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_size");
    let data = make_lines(4 * 1024 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                let reader = ParallelReader::new(ReaderConfig::default().with_chunk_size(chunk_size));
                b.iter(|| black_box(reader.read(black_box(&data[..]), |_| {}).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_bracketed(c: &mut Criterion) {
    let mut group = c.benchmark_group("bracketed");
    let mut data = Vec::new();
    for i in 0..100_000 {
        data.extend_from_slice(format!("<row id=\"{i}\">value {i}</row>\n").as_bytes());
    }
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("rows", |b| {
        let config = ReaderConfig::default()
            .with_boundary_start(&b"<row"[..])
            .with_boundary(&b"</row>"[..]);
        let reader = ParallelReader::new(config);
        b.iter(|| black_box(reader.read(black_box(&data[..]), |_| {}).unwrap()));
    });

    group.finish();
}

fn bench_fixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed");
    let size = 8 * 1024 * 1024;
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("checksum", |b| {
        let reader = ParallelReader::new(ReaderConfig::default());
        b.iter(|| {
            let total = AtomicU64::new(0);
            reader
                .read_fixed(black_box(&data[..]), |chunk| {
                    let sum: u64 = chunk.iter().map(|&b| b as u64).sum();
                    total.fetch_add(sum, Ordering::Relaxed);
                })
                .unwrap();
            black_box(total.into_inner())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_boundary, bench_chunk_sizes, bench_bracketed, bench_fixed);
criterion_main!(benches);
