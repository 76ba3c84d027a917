use crate::{
    config::{EchoSettings, ReverbSettings},
    dsp::oscillator::Waveform,
    graph::reverb::ReverbKernel,
    notes::NoteId,
};

/// One control-surface operation, applied by the engine at a tick boundary.
///
/// Every operation is a single command so it lands atomically: a reverb
/// change carries its new kernel with it rather than arriving in pieces.
pub enum Command {
    NoteOn {
        note: NoteId,
        waveform: Waveform,
        octave: i32,
    },
    NoteOff {
        note: NoteId,
    },
    StopAll,
    SetWaveform(Waveform),
    SetOctave(i32),
    SetMasterVolume(f32),
    SetReverb {
        settings: ReverbSettings,
        /// Present when the decay changed and a new impulse response was built
        kernel: Option<Box<ReverbKernel>>,
    },
    SetEcho(EchoSettings),
}

/// Heap objects the audio side is done with, sent back to be freed.
pub enum Garbage {
    Kernel(Box<ReverbKernel>),
}
