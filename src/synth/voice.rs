use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeStage},
        oscillator::{Oscillator, Waveform},
    },
    graph::node::{GraphNode, RenderCtx},
    notes::NoteId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Attack,    // Ramping 0 → 1 after note-on
    Sustained, // Holding at full gain
    Release,   // Key released, ramping current gain → 0
    Dead,      // Release finished, waiting to be torn down
}

impl From<EnvelopeStage> for VoiceState {
    fn from(stage: EnvelopeStage) -> Self {
        match stage {
            EnvelopeStage::Attack => VoiceState::Attack,
            EnvelopeStage::Sustain => VoiceState::Sustained,
            EnvelopeStage::Release => VoiceState::Release,
            EnvelopeStage::Idle => VoiceState::Dead,
        }
    }
}

/// One sounding note: an oscillator shaped by an attack/release envelope.
pub struct Voice {
    note: NoteId,
    osc: Oscillator,
    env: Envelope,
    started_at: u64,
}

impl Voice {
    /// Create a voice already in its attack stage.
    pub fn new(
        note: NoteId,
        waveform: Waveform,
        frequency: f32,
        attack: f32,
        release: f32,
        sample_rate: f32,
        started_at: u64,
    ) -> Self {
        let mut env = Envelope::new(attack, release, sample_rate);
        env.note_on();

        Self {
            note,
            osc: Oscillator::new(waveform, frequency),
            env,
            started_at,
        }
    }

    /// Enter the release stage from the current gain.
    ///
    /// Returns the release length in samples if this call started the
    /// release, `None` if the voice was already releasing or dead.
    pub fn release(&mut self) -> Option<u32> {
        if matches!(self.state(), VoiceState::Release | VoiceState::Dead) {
            return None;
        }
        self.env.note_off();
        Some(self.env.release_samples())
    }

    /// Swap the oscillator shape; phase, frequency and envelope are untouched.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.osc.set_frequency(frequency);
    }

    pub fn note(&self) -> NoteId {
        self.note
    }

    /// Current envelope gain in [0, 1].
    pub fn gain(&self) -> f32 {
        self.env.level()
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn state(&self) -> VoiceState {
        self.env.stage().into()
    }

    /// Engine frame at which the voice was created.
    pub fn started_at(&self) -> u64 {
        self.started_at
    }
}

impl GraphNode for Voice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.osc.next_sample(ctx.sample_rate) * self.env.next_sample();
        }
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("note", &self.note)
            .field("state", &self.state())
            .field("gain", &self.gain())
            .field("frequency", &self.frequency())
            .field("waveform", &self.waveform())
            .finish()
    }
}
