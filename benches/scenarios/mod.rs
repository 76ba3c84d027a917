//! Real-world scenario benchmarks.
//!
//! These drive a whole `SynthEngine` through its controller the way a host
//! callback would: chords of voices, effects enabled, parameters moving.

mod effects;
mod voices;

pub use effects::bench_effects;
pub use voices::bench_voices;
