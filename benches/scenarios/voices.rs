//! Benchmarks for polyphony: the cost of live voices through the engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::{NoteId, SynthConfig, SynthEngine, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let config = SynthConfig::default().sample_rate(48_000.0).channels(2).seed(1);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // === SINGLE NOTE ===
        // Baseline: one sine voice, effects disabled
        let (mut engine, mut ctl) = SynthEngine::new(config);
        ctl.note_on(NoteId::A, Waveform::Sine, 4).unwrap();
        group.bench_with_input(BenchmarkId::new("single", size), &size, |b, _| {
            b.iter(|| {
                engine.process(black_box(&mut buffer));
            })
        });

        // === CHORD ===
        // Four sawtooth voices summed
        let (mut engine, mut ctl) = SynthEngine::new(config);
        for note in [NoteId::C, NoteId::E, NoteId::G, NoteId::C5] {
            ctl.note_on(note, Waveform::Sawtooth, 3).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("chord", size), &size, |b, _| {
            b.iter(|| {
                engine.process(black_box(&mut buffer));
            })
        });

        // === EVERY KEY ===
        // All 17 slots live: the polyphony ceiling
        let (mut engine, mut ctl) = SynthEngine::new(config);
        for note in NoteId::ALL {
            ctl.note_on(note, Waveform::Square, 4).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("all_keys", size), &size, |b, _| {
            b.iter(|| {
                engine.process(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
