use base91_core::{decode, encode, encoded_length, Codec, Tier};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_bytes(len: usize) -> Vec<u8> {
    let mut x = 0x2545_F491_4F6C_DD1Du64;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x >> 32) as u8
        })
        .collect()
}

const LENGTHS: [usize; 7] = [1, 12, 100, 1_000, 10_000, 1_000_000, 10_000_000];

// ---------------------------------------------------------------------------
// Encode benchmarks
// ---------------------------------------------------------------------------

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for len in LENGTHS {
        let data = random_bytes(len);
        let mut out = vec![0u8; encoded_length(len).unwrap()];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
            b.iter(|| encode(data, &mut out, true).unwrap());
        });
    }

    group.finish();
}

fn bench_encode_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_tiers");

    let data = random_bytes(1_000_000);
    let mut out = vec![0u8; encoded_length(data.len()).unwrap()];
    group.throughput(Throughput::Bytes(data.len() as u64));
    for tier in Tier::available() {
        let codec = Codec::with_tier(tier).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(tier), &data, |b, data| {
            b.iter(|| codec.encode(data, &mut out, true).unwrap());
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Decode benchmarks
// ---------------------------------------------------------------------------

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for len in LENGTHS {
        let text = base91_core::encode_to_vec(&random_bytes(len)).unwrap();
        let mut out = vec![0u8; len];
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| decode(text, &mut out, true).unwrap());
        });
    }

    group.finish();
}

fn bench_decode_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_tiers");

    let text = base91_core::encode_to_vec(&random_bytes(1_000_000)).unwrap();
    let mut out = vec![0u8; 1_000_000];
    group.throughput(Throughput::Bytes(text.len() as u64));
    for tier in Tier::available() {
        let codec = Codec::with_tier(tier).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(tier), &text, |b, text| {
            b.iter(|| codec.decode(text, &mut out, true).unwrap());
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn bench_validate(c: &mut Criterion) {
    let text = base91_core::encode_to_vec(&random_bytes(1_000_000)).unwrap();
    let mut group = c.benchmark_group("validate");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("1000000", |b| {
        b.iter(|| base91_core::is_valid_text(&text));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_encode_tiers,
    bench_decode,
    bench_decode_tiers,
    bench_validate,
);
criterion_main!(benches);
