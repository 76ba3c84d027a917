pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph; // Voice node trait and the shared effect buses
pub mod io;
pub mod notes; // Closed note set and frequency table
pub mod synth; // Voice management and polyphony

pub use config::{EchoSettings, ReverbSettings, SynthConfig, SynthSettings};
pub use dsp::oscillator::Waveform;
pub use engine::{controller::Controller, SynthEngine};
pub use error::SynthError;
pub use notes::{frequency, NoteId};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Duration of the linear slew applied to gain parameters (master, wet, feedback).
pub const PARAM_RAMP_SECONDS: f32 = 0.01;
