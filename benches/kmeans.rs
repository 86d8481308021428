#[path = "../util/util.rs"]
mod util;

use util::{images, to_samples};

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use palette::Srgb;
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;
use swatchify::{
    kmeans::{plus_plus, Lloyd},
    quantize, KmeansOptions, PaletteSize,
};

const SEED: u64 = 0;

fn bench(
    c: &mut Criterion,
    group: &str,
    samples: &[(String, Vec<Srgb<u8>>)],
    mut f: impl FnMut(&mut Bencher<WallTime>, &(PaletteSize, &[Srgb<u8>])),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (k, secs) in [(16u16, 3), (8, 2), (4, 2)] {
        let k = PaletteSize::try_from(k).unwrap();
        group.measurement_time(Duration::from_secs(secs));
        for (name, samples) in samples {
            group.bench_with_input(
                BenchmarkId::new(k.to_string(), name),
                &(k, samples.as_slice()),
                &mut f,
            );
        }
    }
}

fn plus_plus_seeding(c: &mut Criterion) {
    let samples = to_samples(images(), 5);
    bench(c, "plus_plus_seeding", &samples, |b, &(k, samples)| {
        b.iter(|| plus_plus(samples, k, &mut Xoroshiro128PlusPlus::seed_from_u64(SEED)))
    })
}

fn lloyd_single(c: &mut Criterion) {
    let samples = to_samples(images(), 5);
    bench(c, "lloyd_single", &samples, |b, &(k, samples)| {
        let initial = plus_plus(samples, k, &mut Xoroshiro128PlusPlus::seed_from_u64(SEED)).unwrap();
        b.iter(|| Lloyd::new(samples, initial.clone(), Lloyd::DEFAULT_MAX_ITERATIONS).run())
    })
}

fn lloyd_par(c: &mut Criterion) {
    let samples = to_samples(images(), 5);
    bench(c, "lloyd_par", &samples, |b, &(k, samples)| {
        let initial = plus_plus(samples, k, &mut Xoroshiro128PlusPlus::seed_from_u64(SEED)).unwrap();
        b.iter(|| Lloyd::new(samples, initial.clone(), Lloyd::DEFAULT_MAX_ITERATIONS).run_par())
    })
}

fn quantize_single(c: &mut Criterion) {
    let samples = to_samples(images(), 5);
    let options = KmeansOptions::new().seed(SEED);
    bench(c, "quantize_single", &samples, |b, &(k, samples)| {
        b.iter(|| quantize(samples, k, &options))
    })
}

criterion_group!(benches, plus_plus_seeding, lloyd_single, lloyd_par, quantize_single);
criterion_main!(benches);
