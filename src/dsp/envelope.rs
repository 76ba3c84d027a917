use crate::MIN_TIME;

/*
Attack/Release Envelope
=======================

A two-segment linear gain curve for keyboard voices.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the oscillator to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Sustain or
              Release. A state machine governs transitions.

  gate        note_on starts Attack from zero. note_off starts Release from
              wherever the level currently is.


The Shape
---------

  Level
    1.0 ┐      ________________
        │     ╱                ╲
        │    ╱                  ╲
        │   ╱                    ╲
    0.0 └──╱──────────────────────╲──→ Time
          Attack    Sustain     Release
         (0 → 1)    (hold 1)   (level → 0)

Both ramps are counted in samples, so their durations are exact:

    attack_samples  = round(attack_time  * sample_rate)
    release_samples = round(release_time * sample_rate)

After exactly `attack_samples` calls to `next_sample` the level is 1.0.
After exactly `release_samples` calls following note_off the level is 0.0 and
the envelope is Idle again.


Early Release
-------------

Release snapshots the CURRENT level and interpolates from there:

    level = release_start * (1 - elapsed / release_samples)

Releasing halfway through the attack (level 0.5) ramps 0.5 → 0 over the full
release time. The curve stays continuous: no jump up to 1.0 first, no click.


The State Machine
-----------------

    ┌──────┐  note_on   ┌────────┐  level = 1  ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ──────────→ │ Sustain │
    └──────┘            └────────┘             └─────────┘
        ↑                   │ note_off              │ note_off
        │                   ↓                       ↓
        │   level = 0  ┌─────────┐                  │
        └───────────── │ Release │ ←────────────────┘
                       └─────────┘
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping 0 → 1
    Sustain, // Holding at 1.0 while gate is high
    Release, // Gate went low, ramping current → 0
}

pub struct Envelope {
    attack_samples: u32,
    release_samples: u32,

    stage: EnvelopeStage,
    level: f32,

    attack_elapsed_samples: u32,

    // Release bookkeeping (snapshot at note_off)
    release_start_level: f32,
    release_elapsed_samples: u32,
}

impl Envelope {
    /// Create an envelope with durations in seconds.
    pub fn new(attack: f32, release: f32, sample_rate: f32) -> Self {
        Self {
            attack_samples: Self::to_samples(attack, sample_rate),
            release_samples: Self::to_samples(release, sample_rate),

            stage: EnvelopeStage::Idle,
            level: 0.0,
            attack_elapsed_samples: 0,
            release_start_level: 0.0,
            release_elapsed_samples: 0,
        }
    }

    fn to_samples(seconds: f32, sample_rate: f32) -> u32 {
        (seconds.max(MIN_TIME) * sample_rate).round().max(1.0) as u32
    }

    /// Gate high: start the attack phase from zero.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.attack_elapsed_samples = 0;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Attack;
    }

    /// Gate low: start the release phase from the current level.
    ///
    /// Ignored when idle or already releasing, so repeated note-offs keep the
    /// original release timing.
    pub fn note_off(&mut self) {
        if matches!(self.stage, EnvelopeStage::Idle | EnvelopeStage::Release) {
            return;
        }

        self.release_start_level = self.level;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.attack_elapsed_samples += 1;
                self.level = self.attack_elapsed_samples as f32 / self.attack_samples as f32;

                if self.attack_elapsed_samples >= self.attack_samples {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = 1.0;
            }

            EnvelopeStage::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeStage::Idle)
    }

    /// Current envelope level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn release_samples(&self) -> u32 {
        self.release_samples
    }
}
