use rand::Rng;

use crate::{
    config::ReverbSettings,
    dsp::{
        convolver::{Convolver, REVERB_BLOCK},
        impulse::ImpulseResponse,
        smoother::ParamSmoother,
    },
    PARAM_RAMP_SECONDS,
};

/*
Convolution Reverb with Kernel Hot-Swap
=======================================

The wet path convolves the mono master bus with one impulse-response channel
per output channel:

    bus ──┬──► Convolver(h_L) ──► × wet ──► + out[L]
          └──► Convolver(h_R) ──► × wet ──► + out[R]

A kernel (the set of per-channel convolvers) is expensive to build: noise has
to be generated and every partition transformed. Kernels are therefore built
on the control side and handed over ready to run.

Swapping kernels without a gap
------------------------------
Audio that entered the old kernel is still ringing in its history when the
new one arrives. Cutting it off would drop the tail abruptly, so the old
kernel moves to a `retiring` slot and keeps running on silence until its
`tail_len` has played out:

    input ─────────► new kernel ──┐
                                  + ──► × wet ──► out
    silence ───────► old kernel ──┘   (until its tail is exhausted)

Once the tail is done the old kernel is handed back to the caller so it can
be freed away from the audio thread.

Only one tail retires at a time. A kernel arriving while a tail is still
playing waits in `pending`; when the tail finishes, the pending kernel is
installed and the current one starts retiring in turn. A newer arrival
replaces the pending kernel, which has never seen any input and can be freed
at once:

    apply(k2) ──► current k2, retiring k1
    apply(k3) ──► current k2, retiring k1, pending k3
    apply(k4) ──► current k2, retiring k1, pending k4   (k3 handed back)
    k1 done   ──► current k4, retiring k2               (k1 handed back)

No tail is ever cut short. The cost is that a new decay can take up to one
tail length to be heard while the knob is moving.

Bypass
------
While disabled and the wet gain has faded to exactly zero, convolution is
skipped entirely and the kernel's history is cleared, so re-enabling starts
from silence instead of resuming a stale tail.
*/

/// A reverb impulse response prepared for convolution, one convolver per
/// output channel.
pub struct ReverbKernel {
    convolvers: Vec<Convolver>,
    decay: f32,
}

impl ReverbKernel {
    pub fn new(impulse: &ImpulseResponse, channels: usize) -> Self {
        let convolvers = (0..channels.max(1))
            .map(|ch| Convolver::new(impulse.channel(ch), REVERB_BLOCK))
            .collect();

        Self {
            convolvers,
            decay: impulse.decay(),
        }
    }

    /// Generate a fresh impulse response and prepare it.
    pub fn generate<R: Rng>(decay: f32, sample_rate: f32, channels: usize, rng: &mut R) -> Self {
        let impulse = ImpulseResponse::generate(decay, sample_rate, channels, rng);
        Self::new(&impulse, channels)
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn channels(&self) -> usize {
        self.convolvers.len()
    }

    /// Samples of output after the last non-silent input.
    pub fn tail_len(&self) -> usize {
        self.convolvers
            .iter()
            .map(Convolver::tail_len)
            .max()
            .unwrap_or(0)
    }

    #[inline]
    fn process(&mut self, channel: usize, input: f32) -> f32 {
        self.convolvers[channel].process_sample(input)
    }

    pub fn reset(&mut self) {
        for conv in &mut self.convolvers {
            conv.reset();
        }
    }
}

pub struct Reverb {
    kernel: Box<ReverbKernel>,
    retiring: Option<Box<ReverbKernel>>,
    retiring_remaining: usize,
    /// Next kernel to install once `retiring` is done
    pending: Option<Box<ReverbKernel>>,
    wet: ParamSmoother,
    settings: ReverbSettings,
    bypassed: bool,
}

impl Reverb {
    pub fn new(settings: ReverbSettings, kernel: Box<ReverbKernel>, sample_rate: f32) -> Self {
        Self {
            kernel,
            retiring: None,
            retiring_remaining: 0,
            pending: None,
            wet: ParamSmoother::new(settings.effective_wet(), PARAM_RAMP_SECONDS, sample_rate),
            bypassed: !settings.enabled,
            settings,
        }
    }

    /// Apply new settings, optionally installing a freshly built kernel.
    ///
    /// Returns a kernel that is no longer referenced and must be disposed of
    /// by the caller. At most one is displaced per call.
    #[must_use]
    pub fn apply(
        &mut self,
        settings: ReverbSettings,
        kernel: Option<Box<ReverbKernel>>,
    ) -> Option<Box<ReverbKernel>> {
        self.wet.set_target(settings.effective_wet());
        self.settings = settings;

        let displaced = kernel.and_then(|incoming| {
            if self.retiring.is_some() || self.pending.is_some() {
                return self.pending.replace(incoming);
            }
            let outgoing = std::mem::replace(&mut self.kernel, incoming);
            if self.bypassed {
                // Nothing is ringing in a bypassed kernel.
                return Some(outgoing);
            }
            self.start_retiring(outgoing);
            None
        });

        if settings.enabled {
            self.bypassed = false;
        }
        displaced
    }

    /// Add the wet signal for the mono `input` into the interleaved `out`.
    ///
    /// Returns the retiring kernel once its tail has finished.
    #[must_use]
    pub fn render(
        &mut self,
        input: &[f32],
        out: &mut [f32],
        channels: usize,
    ) -> Option<Box<ReverbKernel>> {
        if self.is_silent() {
            if !self.bypassed {
                self.kernel.reset();
                self.bypassed = true;
            }
            if let Some(old) = self.retiring.take() {
                return Some(old);
            }
            return self
                .pending
                .take()
                .map(|next| std::mem::replace(&mut self.kernel, next));
        }

        let mut finished = false;
        for (frame, &x) in out.chunks_exact_mut(channels).zip(input) {
            let wet = self.wet.next_value();

            for (ch, o) in frame.iter_mut().enumerate() {
                let mut y = self.kernel.process(ch, x);
                if let Some(old) = self.retiring.as_mut() {
                    y += old.process(ch, 0.0);
                }
                *o += y * wet;
            }

            if self.retiring.is_some() {
                self.retiring_remaining = self.retiring_remaining.saturating_sub(1);
                finished |= self.retiring_remaining == 0;
            }
        }

        if !finished {
            return None;
        }
        let done = self.retiring.take();
        if let Some(next) = self.pending.take() {
            let outgoing = std::mem::replace(&mut self.kernel, next);
            self.start_retiring(outgoing);
        }
        done
    }

    fn start_retiring(&mut self, kernel: Box<ReverbKernel>) {
        self.retiring_remaining = kernel.tail_len();
        self.retiring = Some(kernel);
    }

    fn is_silent(&self) -> bool {
        !self.settings.enabled && self.wet.is_settled() && self.wet.value() == 0.0
    }

    pub fn settings(&self) -> ReverbSettings {
        self.settings
    }

    /// Wet gain currently applied (mid-ramp values included).
    pub fn wet_gain(&self) -> f32 {
        self.wet.value()
    }

    pub fn kernel(&self) -> &ReverbKernel {
        &self.kernel
    }

    pub fn is_retiring(&self) -> bool {
        self.retiring.is_some()
    }

    /// True while a kernel waits for the retiring tail to finish.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }
}
