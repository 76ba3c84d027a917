//! Benchmarks for the effect buses inside a running engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::{
    EchoSettings, NoteId, ReverbSettings, SynthConfig, SynthEngine, Waveform,
};

use crate::BLOCK_SIZES;

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/effects");
    let base = SynthConfig::default().sample_rate(48_000.0).channels(2).seed(1);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // Stereo reverb (2 s), chord playing
        let config = base.reverb(ReverbSettings::new(true, 0.3, 2.0));
        let (mut engine, mut ctl) = SynthEngine::new(config);
        for note in [NoteId::C, NoteId::E, NoteId::G] {
            ctl.note_on(note, Waveform::Triangle, 4).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("reverb", size), &size, |b, _| {
            b.iter(|| {
                engine.process(black_box(&mut buffer));
            })
        });

        // Everything on: reverb and echo together
        let config = base
            .reverb(ReverbSettings::new(true, 0.3, 2.0))
            .echo(EchoSettings::new(true, 0.3, 0.3, 0.5));
        let (mut engine, mut ctl) = SynthEngine::new(config);
        for note in [NoteId::C, NoteId::E, NoteId::G] {
            ctl.note_on(note, Waveform::Triangle, 4).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("reverb_echo", size), &size, |b, _| {
            b.iter(|| {
                engine.process(black_box(&mut buffer));
            })
        });

        // Both wet paths disabled: the bypass should cost next to nothing
        let (mut engine, mut ctl) = SynthEngine::new(base);
        ctl.note_on(NoteId::A, Waveform::Sine, 4).unwrap();
        group.bench_with_input(BenchmarkId::new("bypassed", size), &size, |b, _| {
            b.iter(|| {
                engine.process(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
