//! Benchmarks for the delay line and the echo built on it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_keys::{dsp::delay::DelayLine, graph::echo::Echo, EchoSettings};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut output = vec![0.0f32; size];

        // Raw integer-tap delay line
        let mut line = DelayLine::new(96_000);
        group.bench_with_input(BenchmarkId::new("line", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += line.next_sample(black_box(sample), 14_400);
                }
                sum
            })
        });

        // Echo: interpolated tap, feedback and wet smoothing
        let mut echo = Echo::new(EchoSettings::new(true, 0.4, 0.3, 0.6), sample_rate);
        group.bench_with_input(BenchmarkId::new("echo", size), &size, |b, _| {
            b.iter(|| {
                echo.render(black_box(&input), black_box(&mut output));
            })
        });

        // Echo while its delay time keeps moving (crossfading two taps)
        let mut echo = Echo::new(EchoSettings::new(true, 0.4, 0.3, 0.6), sample_rate);
        let mut toggle = false;
        group.bench_with_input(BenchmarkId::new("echo_crossfade", size), &size, |b, _| {
            b.iter(|| {
                toggle = !toggle;
                let delay = if toggle { 0.25 } else { 0.35 };
                echo.apply(EchoSettings::new(true, 0.4, delay, 0.6));
                echo.render(black_box(&input), black_box(&mut output));
            })
        });
    }

    group.finish();
}
