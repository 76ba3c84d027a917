//! Benchmarks for the attack/release envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack ramp: a divide per sample
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            let mut env = Envelope::new(10.0, 0.3, sample_rate);
            env.note_on();
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Sustain: steady state
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            let mut env = Envelope::new(0.001, 0.3, sample_rate);
            env.note_on();
            env.render(&mut vec![0.0; 1_000]);
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });

        // Release ramp
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            let mut env = Envelope::new(0.001, 10.0, sample_rate);
            env.note_on();
            env.render(&mut vec![0.0; 1_000]);
            env.note_off();
            b.iter(|| {
                env.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
