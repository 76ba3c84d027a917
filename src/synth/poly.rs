use crate::{
    dsp::oscillator::Waveform,
    graph::node::{GraphNode, RenderCtx},
    notes::{frequency, NoteId},
    synth::voice::Voice,
    MAX_BLOCK_SIZE,
};

/// Keeps at most one live voice per note and sums them into a mono bus.
///
/// Each note owns a fixed slot, so "one voice per note" holds by
/// construction and starting a note never allocates.
pub struct VoiceManager {
    slots: [Option<Voice>; NoteId::COUNT],
    sample_rate: f32,
    attack: f32,
    release: f32,
    temp_buffer: Vec<f32>,
}

impl VoiceManager {
    pub fn new(sample_rate: f32, attack: f32, release: f32) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            sample_rate,
            attack,
            release,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Start `note`, hard-cutting any voice already sounding for it.
    ///
    /// Returns true when an existing voice was replaced.
    pub fn note_on(&mut self, note: NoteId, waveform: Waveform, octave: i32, now: u64) -> bool {
        let voice = Voice::new(
            note,
            waveform,
            frequency(note, octave),
            self.attack,
            self.release,
            self.sample_rate,
            now,
        );
        self.slots[note.index()].replace(voice).is_some()
    }

    /// Release `note`. Returns the release length in samples when a release
    /// actually started; `None` if no voice exists or it is already releasing.
    pub fn note_off(&mut self, note: NoteId) -> Option<u32> {
        self.slots[note.index()].as_mut()?.release()
    }

    /// Release every live voice, calling `on_release` for each release started.
    pub fn release_all(&mut self, mut on_release: impl FnMut(NoteId, u32)) {
        for voice in self.slots.iter_mut().flatten() {
            if let Some(samples) = voice.release() {
                on_release(voice.note(), samples);
            }
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        for voice in self.slots.iter_mut().flatten() {
            voice.set_waveform(waveform);
        }
    }

    pub fn set_octave(&mut self, octave: i32) {
        for voice in self.slots.iter_mut().flatten() {
            voice.set_frequency(frequency(voice.note(), octave));
        }
    }

    /// Tear down the voice for `note`. Returns true if one existed.
    pub fn remove(&mut self, note: NoteId) -> bool {
        self.slots[note.index()].take().is_some()
    }

    /// Overwrite `out` with the sum of all live voices.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);
        out.fill(0.0);

        let temp = &mut self.temp_buffer[..out.len()];
        for voice in self.slots.iter_mut().flatten() {
            voice.render_block(temp, ctx);
            for (o, v) in out.iter_mut().zip(temp.iter()) {
                *o += v;
            }
        }
    }

    pub fn voice(&self, note: NoteId) -> Option<&Voice> {
        self.slots[note.index()].as_ref()
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.slots.iter().flatten()
    }

    /// Number of live voices, including those still releasing.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
