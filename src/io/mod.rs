// Purpose - output sinks for rendered audio

#[cfg(feature = "device")]
pub mod device;

use crate::SynthEngine;

/// Offline sink: pulls interleaved audio from an engine into memory.
///
/// Renders in host-sized blocks the way a device callback would, so command
/// timing matches a live stream with the same block size.
#[derive(Debug)]
pub struct AudioOutput {
    channels: usize,
    block_frames: usize,
    samples: Vec<f32>,
}

impl AudioOutput {
    pub fn new(channels: usize) -> Self {
        Self {
            channels: channels.max(1),
            block_frames: 256,
            samples: Vec::new(),
        }
    }

    /// Sink matching `engine`'s channel layout.
    pub fn for_engine(engine: &SynthEngine) -> Self {
        Self::new(engine.channels())
    }

    /// Frames per simulated host callback.
    pub fn block_frames(mut self, frames: usize) -> Self {
        self.block_frames = frames.max(1);
        self
    }

    /// Render `frames` more frames and append them. Returns the new samples.
    pub fn render(&mut self, engine: &mut SynthEngine, frames: usize) -> &[f32] {
        debug_assert_eq!(engine.channels(), self.channels);
        let start = self.samples.len();
        self.samples.resize(start + frames * self.channels, 0.0);

        for block in self.samples[start..].chunks_mut(self.block_frames * self.channels) {
            engine.process(block);
        }

        &self.samples[start..]
    }

    /// Render `seconds` of audio at the engine's sample rate.
    pub fn render_seconds(&mut self, engine: &mut SynthEngine, seconds: f32) -> &[f32] {
        let frames = (seconds * engine.sample_rate()).round() as usize;
        self.render(engine, frames)
    }

    /// Every interleaved sample rendered so far.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// One channel de-interleaved.
    pub fn channel(&self, channel: usize) -> Vec<f32> {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.channels)
            .copied()
            .collect()
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoteId, SynthConfig, Waveform};

    #[test]
    fn renders_requested_frames_in_blocks() {
        let (mut engine, mut ctl) =
            SynthEngine::new(SynthConfig::default().sample_rate(8_000.0).seed(3));
        let mut output = AudioOutput::for_engine(&engine).block_frames(64);

        ctl.note_on(NoteId::A, Waveform::Sine, 4).unwrap();
        assert_eq!(output.render(&mut engine, 1_000).len(), 2_000);
        assert_eq!(output.frames(), 1_000);
        assert_eq!(engine.clock(), 1_000);

        let left = output.channel(0);
        let right = output.channel(1);
        assert_eq!(left, right);
        assert!(output.peak() > 0.0 && output.peak() <= 0.5 + 1e-6);
    }
}
