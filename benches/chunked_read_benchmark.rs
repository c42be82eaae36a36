use chunked_source::{ChunkedSource, MemoryTransport, SourceOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

const SOURCE_SIZE: usize = 16 * 1024 * 1024;

fn generate_random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn random_ranges(count: usize, span: u64) -> Vec<(u64, u64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let start = rng.gen_range(0..SOURCE_SIZE as u64 - span);
            (start, start + rng.gen_range(1..=span))
        })
        .collect()
}

fn chunked_reads(c: &mut Criterion) {
    let data = generate_random_data(SOURCE_SIZE);
    let inputs = [
        ("chunk_size_4k", 4 * 1024),
        ("chunk_size_8k", 8 * 1024),
        ("chunk_size_64k", 64 * 1024),
    ];
    let ranges = random_ranges(1000, 32 * 1024);

    for (name, chunk_size) in inputs.iter() {
        let mut group = c.benchmark_group(name.to_string());
        group.measurement_time(std::time::Duration::from_secs(5));

        // Every read goes to the transport
        let cold = SourceOptions::default()
            .chunk_size(*chunk_size)
            .cache_limit(Some(*chunk_size as usize));
        // The whole source fits in the cache after the first pass
        let warm = SourceOptions::default()
            .chunk_size(*chunk_size)
            .cache_limit(None);

        for (label, options) in [("cold", cold), ("warm", warm)] {
            let transport = MemoryTransport::new("bench", data.clone());
            let mut source = ChunkedSource::new(transport, &options)
                .expect("failed to create source");
            let ranges = ranges.clone();

            group.bench_function(label, move |b| {
                b.iter(|| {
                    for (start, stop) in ranges.iter() {
                        black_box(
                            source
                                .data(*start, *stop)
                                .expect("data returned an error"),
                        );
                    }
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, chunked_reads);
criterion_main!(benches);
