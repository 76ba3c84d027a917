use crate::{
    config::EchoSettings,
    dsp::{delay::DelayLine, smoother::ParamSmoother},
    PARAM_RAMP_SECONDS,
};

/*
Echo (Feedback Delay)
=====================

One delay line with its output fed back into its own input:

              ┌──────────────────── × feedback ◄───┐
              ↓                                    │
    input ──► + ──► [ delay line: delay_time ] ────┼──► × wet ──► out
                                                   │
                                               delayed

Each trip around the loop multiplies the signal by `feedback`, so an impulse
comes back as a train of repeats with amplitudes 1, g, g², g³, ... one
`delay_time` apart. With g < 1 the train decays geometrically; at g ≥ 1 it
would hold or grow forever, so feedback is clamped to MAX_FEEDBACK.

Parameter changes while sound is in the loop:
- wet and feedback are gains: they slew linearly over PARAM_RAMP_SECONDS
- delay_time moves the read tap; jumping it would splice two unrelated points
  of the buffer together, so the old and new taps are crossfaded over
  DELAY_CROSSFADE_SECONDS instead. A change arriving mid-fade is queued and
  starts when the running fade lands, so the output never leaves a blend
  halfway. Only the newest queued change is kept.

The output of `render` is the wet signal only. The dry path is summed by the
effects chain.
*/

/// Shortest echo period in seconds.
pub const MIN_DELAY: f32 = 0.001;
/// Longest echo period in seconds. The delay line is sized for this up front.
pub const MAX_DELAY: f32 = 2.0;
/// Feedback ceiling; keeps the loop strictly decaying.
pub const MAX_FEEDBACK: f32 = 0.95;
/// Length of the tap crossfade on delay-time changes.
pub const DELAY_CROSSFADE_SECONDS: f32 = 0.02;

/// Clamp a delay time (seconds) into `[MIN_DELAY, MAX_DELAY]`; NaN → `MIN_DELAY`.
pub fn clamp_delay_time(seconds: f32) -> f32 {
    if seconds.is_nan() {
        return MIN_DELAY;
    }
    seconds.clamp(MIN_DELAY, MAX_DELAY)
}

/// Clamp a feedback gain into `[0, MAX_FEEDBACK]`; NaN → 0.
pub fn clamp_feedback(gain: f32) -> f32 {
    if gain.is_nan() {
        return 0.0;
    }
    gain.clamp(0.0, MAX_FEEDBACK)
}

pub struct Echo {
    line: DelayLine,
    sample_rate: f32,
    settings: EchoSettings,

    /// Current read tap in samples
    delay: f32,
    /// Tap being faded out
    previous_delay: f32,
    fade_len: u32,
    fade_remaining: u32,
    /// Tap to fade to once the running fade completes
    queued_delay: Option<f32>,

    feedback: ParamSmoother,
    wet: ParamSmoother,
    /// Loop cleared while disabled and silent
    idle: bool,
}

impl Echo {
    pub fn new(settings: EchoSettings, sample_rate: f32) -> Self {
        let settings = EchoSettings::new(
            settings.enabled,
            settings.wet_level,
            settings.delay_time,
            settings.feedback,
        );
        // +2 leaves room for the interpolated read at MAX_DELAY
        let capacity = (MAX_DELAY * sample_rate).ceil() as usize + 2;
        let delay = settings.delay_time * sample_rate;

        Self {
            line: DelayLine::new(capacity),
            sample_rate,
            settings,
            delay,
            previous_delay: delay,
            fade_len: (DELAY_CROSSFADE_SECONDS * sample_rate).round().max(1.0) as u32,
            fade_remaining: 0,
            queued_delay: None,
            feedback: ParamSmoother::new(settings.feedback, PARAM_RAMP_SECONDS, sample_rate),
            wet: ParamSmoother::new(settings.effective_wet(), PARAM_RAMP_SECONDS, sample_rate),
            idle: !settings.enabled,
        }
    }

    /// Apply new settings. Values are expected to be clamped already.
    pub fn apply(&mut self, settings: EchoSettings) {
        self.wet.set_target(settings.effective_wet());
        self.feedback.set_target(settings.feedback);

        let delay = settings.delay_time * self.sample_rate;
        let moved = (delay - self.delay).abs() >= 0.5;
        if self.fade_remaining > 0 {
            self.queued_delay = moved.then_some(delay);
        } else if moved {
            self.start_fade(delay);
        }

        if settings.enabled {
            self.idle = false;
        }
        self.settings = settings;
    }

    fn start_fade(&mut self, delay: f32) {
        self.previous_delay = self.delay;
        self.delay = delay;
        self.fade_remaining = self.fade_len;
    }

    #[inline]
    fn tap(&mut self) -> f32 {
        if self.fade_remaining == 0 {
            if let Some(delay) = self.queued_delay.take() {
                self.start_fade(delay);
            }
        }

        let current = self.line.read_interpolated(self.delay);
        if self.fade_remaining == 0 {
            return current;
        }

        let previous = self.line.read_interpolated(self.previous_delay);
        let t = 1.0 - self.fade_remaining as f32 / self.fade_len as f32;
        self.fade_remaining -= 1;
        previous + (current - previous) * t
    }

    /// Push one input sample through the loop and return the wet output.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let delayed = self.tap();
        let feedback = self.feedback.next_value();
        self.line.write(input + delayed * feedback);
        delayed * self.wet.next_value()
    }

    /// Render the wet signal for `input` into `out` (overwritten).
    pub fn render(&mut self, input: &[f32], out: &mut [f32]) {
        if self.is_silent() {
            if !self.idle {
                self.reset();
                self.idle = true;
            }
            out.fill(0.0);
            return;
        }

        for (o, &x) in out.iter_mut().zip(input) {
            *o = self.process_sample(x);
        }
    }

    /// Disabled and the wet gain has finished fading to zero.
    fn is_silent(&self) -> bool {
        !self.settings.enabled && self.wet.is_settled() && self.wet.value() == 0.0
    }

    pub fn reset(&mut self) {
        self.line.reset();
        if let Some(delay) = self.queued_delay.take() {
            self.delay = delay;
        }
        self.fade_remaining = 0;
        self.previous_delay = self.delay;
    }

    pub fn settings(&self) -> EchoSettings {
        self.settings
    }

    /// Wet gain currently applied (mid-ramp values included).
    pub fn wet_gain(&self) -> f32 {
        self.wet.value()
    }

    /// Feedback gain currently applied (mid-ramp values included).
    pub fn feedback_gain(&self) -> f32 {
        self.feedback.value()
    }

    /// Read tap in samples. A change queued behind a running fade is not
    /// reflected until that fade completes.
    pub fn delay_samples(&self) -> f32 {
        self.delay
    }
}
