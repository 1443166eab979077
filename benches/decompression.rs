use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oneshot_decode::{DecoderOptions, StepDecoder, ZstdStep};
use std::hint::black_box;
use std::time::Duration;

fn generate_compressed_data(size: usize, pattern: &str) -> Vec<u8> {
    let original = match pattern {
        "text" => {
            let base = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
            let mut data = Vec::with_capacity(size);
            while data.len() < size {
                data.extend_from_slice(base);
            }
            data.truncate(size);
            data
        }
        "binary" => (0..size).map(|i| ((i * 17 + 11) % 256) as u8).collect(),
        "random" => (0..size)
            .map(|i| {
                let x = i as u32;
                ((x.wrapping_mul(1664525).wrapping_add(1013904223)) >> 13) as u8
            })
            .collect(),
        _ => panic!("Unknown pattern: {}", pattern),
    };

    zstd::encode_all(&original[..], 3).expect("Compression failed")
}

fn size_label(size: usize) -> &'static str {
    match size {
        1024 => "1KB",
        102400 => "100KB",
        1048576 => "1MB",
        10485760 => "10MB",
        _ => "unknown",
    }
}

fn step_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_throughput");
    group.measurement_time(Duration::from_secs(10));

    for size in [1024, 102400, 1048576, 10485760] {
        for pattern in ["text", "binary", "random"] {
            let compressed = generate_compressed_data(size, pattern);
            let id = BenchmarkId::new(pattern, size_label(size));

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(id, &compressed, |b, compressed| {
                let mut decoder = StepDecoder::new(ZstdStep::new().unwrap()).unwrap();
                b.iter(|| decoder.decompress(black_box(compressed)).unwrap());
            });
        }
    }

    group.finish();
}

fn buffer_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_policy");
    let size = 10485760;
    let compressed = generate_compressed_data(size, "text");
    group.throughput(Throughput::Bytes(size as u64));

    for (label, shrink) in [("keep_grown", false), ("shrink_after", true)] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &compressed, |b, data| {
            let options = DecoderOptions::default().with_shrink(shrink);
            let mut decoder = StepDecoder::with_options(ZstdStep::new().unwrap(), options).unwrap();
            b.iter(|| decoder.decompress(black_box(data)).unwrap());
        });
    }

    group.bench_with_input(BenchmarkId::from_parameter("fresh_context"), &compressed, |b, data| {
        b.iter(|| oneshot_decode::decompress_bytes(black_box(data)).unwrap());
    });

    group.finish();
}

#[cfg(feature = "stream")]
fn backend_comparison(c: &mut Criterion) {
    use oneshot_decode::{StreamDecoder, StreamOptions, ZstdStream};

    let mut group = c.benchmark_group("backend_comparison");
    group.measurement_time(Duration::from_secs(10));

    for size in [1024, 1048576] {
        let compressed = generate_compressed_data(size, "text");
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("step", size_label(size)),
            &compressed,
            |b, data| {
                let mut decoder = StepDecoder::new(ZstdStep::new().unwrap()).unwrap();
                b.iter(|| decoder.decompress(black_box(data)).unwrap());
            },
        );

        for (label, options) in [
            ("stream_default", StreamOptions::default()),
            ("stream_large", StreamOptions::large_input()),
        ] {
            group.bench_with_input(
                BenchmarkId::new(label, size_label(size)),
                &compressed,
                |b, data| {
                    let token = Default::default();
                    let mut decoder =
                        StreamDecoder::with_options(ZstdStream::new(), &token, options.clone())
                            .unwrap();
                    b.iter(|| decoder.decompress(black_box(data)).unwrap());
                },
            );
        }
    }

    group.finish();
}

#[cfg(not(feature = "stream"))]
fn backend_comparison(_c: &mut Criterion) {}

criterion_group!(benches, step_throughput, buffer_policy, backend_comparison);
criterion_main!(benches);
