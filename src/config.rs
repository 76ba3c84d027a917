//! Engine configuration and the parameter values the control surface exposes.
//!
//! Every value entering the core goes through the clamps in this module, so a
//! setting read back from `Controller::settings` is always the value the
//! engine is actually using.

use crate::{
    dsp::{impulse::clamp_decay, oscillator::Waveform},
    graph::echo::{clamp_delay_time, clamp_feedback},
    notes::clamp_octave,
    MIN_TIME,
};

/// Clamp into [0, 1]; NaN becomes 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    pub enabled: bool,
    /// Wet gain in [0, 1]
    pub wet_level: f32,
    /// Impulse response length in seconds
    pub decay: f32,
}

impl ReverbSettings {
    pub fn new(enabled: bool, wet_level: f32, decay: f32) -> Self {
        Self {
            enabled,
            wet_level: clamp_unit(wet_level),
            decay: clamp_decay(decay),
        }
    }

    /// Gain actually applied to the wet path: zero while disabled.
    pub fn effective_wet(&self) -> f32 {
        if self.enabled {
            self.wet_level
        } else {
            0.0
        }
    }
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self::new(false, 0.3, 2.0)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoSettings {
    pub enabled: bool,
    /// Wet gain in [0, 1]
    pub wet_level: f32,
    /// Seconds between repeats
    pub delay_time: f32,
    /// Gain of each repeat relative to the previous one, below 1
    pub feedback: f32,
}

impl EchoSettings {
    pub fn new(enabled: bool, wet_level: f32, delay_time: f32, feedback: f32) -> Self {
        Self {
            enabled,
            wet_level: clamp_unit(wet_level),
            delay_time: clamp_delay_time(delay_time),
            feedback: clamp_feedback(feedback),
        }
    }

    /// Gain actually applied to the wet path: zero while disabled.
    pub fn effective_wet(&self) -> f32 {
        if self.enabled {
            self.wet_level
        } else {
            0.0
        }
    }
}

impl Default for EchoSettings {
    fn default() -> Self {
        Self::new(false, 0.3, 0.3, 0.4)
    }
}

/// Current value of every parameter the external layer can set.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSettings {
    pub waveform: Waveform,
    pub octave: i32,
    pub master_volume: f32,
    pub reverb: ReverbSettings,
    pub echo: EchoSettings,
}

impl SynthSettings {
    /// Re-apply every clamp (idempotent).
    pub fn clamped(self) -> Self {
        Self {
            waveform: self.waveform,
            octave: clamp_octave(self.octave),
            master_volume: clamp_unit(self.master_volume),
            reverb: ReverbSettings::new(
                self.reverb.enabled,
                self.reverb.wet_level,
                self.reverb.decay,
            ),
            echo: EchoSettings::new(
                self.echo.enabled,
                self.echo.wet_level,
                self.echo.delay_time,
                self.echo.feedback,
            ),
        }
    }
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            octave: 4,
            master_volume: 0.5,
            reverb: ReverbSettings::default(),
            echo: EchoSettings::default(),
        }
    }
}

/// Construction-time configuration for `SynthEngine::new`.
///
/// ```ignore
/// let config = SynthConfig::default()
///     .sample_rate(44_100.0)
///     .channels(2)
///     .master_volume(0.8)
///     .seed(7);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    /// Interleaved output channels
    pub channels: usize,
    /// Envelope attack in seconds
    pub attack: f32,
    /// Envelope release in seconds
    pub release: f32,
    /// Initial parameter values
    pub settings: SynthSettings,
    /// Capacity of the control → audio command queue
    pub command_capacity: usize,
    /// Seed for impulse-response noise; `None` draws from entropy
    pub seed: Option<u64>,
}

impl SynthConfig {
    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn attack(mut self, seconds: f32) -> Self {
        self.attack = seconds;
        self
    }

    pub fn release(mut self, seconds: f32) -> Self {
        self.release = seconds;
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.settings.waveform = waveform;
        self
    }

    pub fn octave(mut self, octave: i32) -> Self {
        self.settings.octave = octave;
        self
    }

    pub fn master_volume(mut self, level: f32) -> Self {
        self.settings.master_volume = level;
        self
    }

    pub fn reverb(mut self, reverb: ReverbSettings) -> Self {
        self.settings.reverb = reverb;
        self
    }

    pub fn echo(mut self, echo: EchoSettings) -> Self {
        self.settings.echo = echo;
        self
    }

    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Copy of this configuration with every value forced into range.
    pub fn validated(self) -> Self {
        let sample_rate = if self.sample_rate.is_finite() {
            self.sample_rate.clamp(8_000.0, 384_000.0)
        } else {
            48_000.0
        };

        Self {
            sample_rate,
            channels: self.channels.max(1),
            attack: self.attack.max(MIN_TIME),
            release: self.release.max(MIN_TIME),
            settings: self.settings.clamped(),
            command_capacity: self.command_capacity.max(16),
            seed: self.seed,
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            channels: 2,
            attack: 0.02,
            release: 0.3,
            settings: SynthSettings::default(),
            command_capacity: 256,
            seed: None,
        }
    }
}
