//! Benchmarks for partitioned FFT convolution.
//!
//! Cost grows with the number of partitions, so a 4 second response is
//! roughly twice the work of a 2 second one per block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use saavy_keys::dsp::{
    convolver::{Convolver, REVERB_BLOCK},
    impulse::ImpulseResponse,
};

use crate::BLOCK_SIZES;

pub fn bench_convolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolver");
    let sample_rate = 48_000.0;

    for decay in [0.5f32, 2.0, 4.0] {
        let impulse =
            ImpulseResponse::generate(decay, sample_rate, 1, &mut StdRng::seed_from_u64(1));

        for &size in BLOCK_SIZES {
            let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.1).collect();
            let mut conv = Convolver::new(impulse.channel(0), REVERB_BLOCK);

            let name = format!("{decay}s");
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        sum += conv.process_sample(black_box(sample));
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
