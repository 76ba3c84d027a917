//! Synthetic reverb impulse responses.
//!
//! A real room's impulse response is a dense cloud of reflections whose
//! energy decays over time. White noise shaped by a decaying envelope is a
//! cheap stand-in:
//!
//! ```text
//!   h[i] = noise_i × (1 − i/len)²        noise_i uniform in [-1, 1]
//!
//!   1.0 ┤▓
//!       │▓▓▓
//!       │▓▓▓▓▓▓
//!       │▓▓▓▓▓▓▓▓▓▓▓
//!   0.0 ┼▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓─→ i
//!       0                                 len = round(sample_rate × decay)
//! ```
//!
//! Each channel draws its own noise, which decorrelates left and right and
//! gives a stereo reverb its width.
//!
//! Generation is a pure function of `(decay, sample_rate, channels)` and the
//! state of the random source: the same seeded RNG yields the same buffer.

use rand::Rng;

/// Shortest decay accepted; shorter requests are clamped here.
pub const MIN_DECAY: f32 = 0.01;
/// Longest decay accepted; longer requests are clamped here.
pub const MAX_DECAY: f32 = 10.0;

/// Clamp a requested decay duration (seconds) into `[MIN_DECAY, MAX_DECAY]`.
///
/// NaN falls back to the minimum.
pub fn clamp_decay(decay: f32) -> f32 {
    if decay.is_nan() {
        return MIN_DECAY;
    }
    decay.clamp(MIN_DECAY, MAX_DECAY)
}

/// A multi-channel decaying-noise impulse response.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    sample_rate: f32,
    decay: f32,
    channels: Vec<Vec<f32>>,
}

impl ImpulseResponse {
    /// Generate a fresh response from `rng`.
    ///
    /// `decay` is used as given (callers clamp); the length is
    /// `round(sample_rate × decay)`, never less than one sample.
    pub fn generate<R: Rng>(
        decay: f32,
        sample_rate: f32,
        channels: usize,
        rng: &mut R,
    ) -> Self {
        let len = (sample_rate * decay).round().max(1.0) as usize;
        let channels = (0..channels.max(1))
            .map(|_| {
                (0..len)
                    .map(|i| {
                        let envelope = 1.0 - i as f32 / len as f32;
                        rng.gen_range(-1.0f32..=1.0) * envelope * envelope
                    })
                    .collect()
            })
            .collect();

        Self {
            sample_rate,
            decay,
            channels,
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples of channel `index`, wrapping when fewer channels were generated.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index % self.channels.len()]
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
