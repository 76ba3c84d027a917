//! Low-level DSP primitives used by the voices and effect buses.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math; orchestration lives in `graph` and `synth`.

/// FFT-partitioned convolution for long impulse responses.
pub mod convolver;
/// Time-domain delay line with optional interpolation.
pub mod delay;
/// Two-segment attack/release envelope generator.
pub mod envelope;
/// Decaying-noise impulse responses for the reverb.
pub mod impulse;
/// Phase-accumulating oscillator and its waveforms.
pub mod oscillator;
/// Linear parameter slew.
pub mod smoother;

pub use envelope::EnvelopeStage;
