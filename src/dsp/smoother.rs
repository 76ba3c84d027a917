//! Linear parameter smoothing for click-free gain changes.
//!
//! A control change arriving between two blocks would otherwise step the gain
//! instantly, which is audible as a click on any sustained signal. The
//! smoother walks from its current value to the new target in a straight
//! line over a fixed number of samples, then holds the target exactly.

pub struct ParamSmoother {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
    ramp_samples: u32,
}

impl ParamSmoother {
    /// Create a smoother resting at `value`, ramping over `ramp_seconds` on changes.
    pub fn new(value: f32, ramp_seconds: f32, sample_rate: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            remaining: 0,
            ramp_samples: (ramp_seconds * sample_rate).round().max(1.0) as u32,
        }
    }

    /// Start a ramp from the current value towards `target`.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target && self.remaining == 0 {
            return;
        }
        self.target = target;
        self.remaining = self.ramp_samples;
        self.step = (target - self.current) / self.ramp_samples as f32;
    }

    /// Jump straight to `value` without ramping.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.remaining = 0;
    }

    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                // Land exactly on the target; accumulated steps drift.
                self.current = self.target;
            } else {
                self.current += self.step;
            }
        }
        self.current
    }

    /// True once the ramp has finished and the value equals the target.
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}
