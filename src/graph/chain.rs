use crate::{
    config::{EchoSettings, ReverbSettings},
    dsp::smoother::ParamSmoother,
    graph::{
        echo::Echo,
        reverb::{Reverb, ReverbKernel},
    },
    MAX_BLOCK_SIZE, PARAM_RAMP_SECONDS,
};

/*
Effects Chain Routing
=====================

    voices ─► Σ ─► × master ─► bus ─┬──────────────────────────► + ─► out[ch]
                                    ├─► Reverb (per channel) ──► +
                                    └─► Echo (mono) ───────────► +

The dry path is a fixed connection: nothing here can disable it. The two wet
paths are parallel taps of the same master bus, each gated by its own
`enabled` flag through its wet gain, so toggling one never touches the dry
signal or the other effect.

Echo is mono and copied to every channel; the reverb produces a decorrelated
signal per channel.
*/

pub struct EffectsChain {
    channels: usize,
    master: ParamSmoother,
    bus: Vec<f32>,
    echo_wet: Vec<f32>,
    reverb: Reverb,
    echo: Echo,
}

impl EffectsChain {
    pub fn new(
        sample_rate: f32,
        channels: usize,
        master_volume: f32,
        reverb: ReverbSettings,
        kernel: Box<ReverbKernel>,
        echo: EchoSettings,
    ) -> Self {
        Self {
            channels: channels.max(1),
            master: ParamSmoother::new(master_volume, PARAM_RAMP_SECONDS, sample_rate),
            bus: vec![0.0; MAX_BLOCK_SIZE],
            echo_wet: vec![0.0; MAX_BLOCK_SIZE],
            reverb: Reverb::new(reverb, kernel, sample_rate),
            echo: Echo::new(echo, sample_rate),
        }
    }

    pub fn set_master_volume(&mut self, level: f32) {
        self.master.set_target(level);
    }

    /// See [`Reverb::apply`]; the returned kernel must be disposed of.
    #[must_use]
    pub fn set_reverb(
        &mut self,
        settings: ReverbSettings,
        kernel: Option<Box<ReverbKernel>>,
    ) -> Option<Box<ReverbKernel>> {
        self.reverb.apply(settings, kernel)
    }

    pub fn set_echo(&mut self, settings: EchoSettings) {
        self.echo.apply(settings);
    }

    /// Route one tick of summed voice output into the interleaved `out`.
    ///
    /// `out.len()` must equal `dry.len() * channels` and `dry.len()` must not
    /// exceed `MAX_BLOCK_SIZE`. Returns a reverb kernel that finished retiring
    /// during this tick.
    #[must_use]
    pub fn process(&mut self, dry: &[f32], out: &mut [f32]) -> Option<Box<ReverbKernel>> {
        let frames = dry.len();
        debug_assert!(frames <= MAX_BLOCK_SIZE);
        debug_assert_eq!(out.len(), frames * self.channels);

        let bus = &mut self.bus[..frames];
        for (b, &d) in bus.iter_mut().zip(dry) {
            *b = d * self.master.next_value();
        }

        let echo_wet = &mut self.echo_wet[..frames];
        self.echo.render(bus, echo_wet);

        for ((frame, &b), &e) in out
            .chunks_exact_mut(self.channels)
            .zip(bus.iter())
            .zip(echo_wet.iter())
        {
            frame.fill(b + e);
        }

        self.reverb.render(bus, out, self.channels)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Master gain currently applied (mid-ramp values included).
    pub fn master_gain(&self) -> f32 {
        self.master.value()
    }

    pub fn reverb(&self) -> &Reverb {
        &self.reverb
    }

    pub fn echo(&self) -> &Echo {
        &self.echo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::convolver::REVERB_BLOCK;
    use rand::{rngs::StdRng, SeedableRng};

    const SR: f32 = 8_000.0;

    fn chain(channels: usize, reverb: ReverbSettings, echo: EchoSettings) -> EffectsChain {
        let kernel = ReverbKernel::generate(reverb.decay, SR, channels, &mut StdRng::seed_from_u64(5));
        EffectsChain::new(SR, channels, 0.5, reverb, Box::new(kernel), echo)
    }

    #[test]
    fn dry_path_is_master_gained_and_copied_to_every_channel() {
        let mut chain = chain(2, ReverbSettings::default(), EchoSettings::default());
        let dry = [1.0, -0.5, 0.25];
        let mut out = [9.0; 6];

        assert!(chain.process(&dry, &mut out).is_none());
        assert_eq!(out, [0.5, 0.5, -0.25, -0.25, 0.125, 0.125]);
    }

    #[test]
    fn master_volume_change_is_ramped() {
        let mut chain = chain(1, ReverbSettings::default(), EchoSettings::default());
        chain.set_master_volume(1.0);

        let dry = [1.0; 40];
        let mut out = [0.0; 40];
        let _ = chain.process(&dry, &mut out);

        // 10 ms at 8 kHz = 80 samples of ramp
        assert!(out[0] > 0.5 && out[0] < 0.52);
        for pair in out.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(out[39] < 1.0);
    }

    #[test]
    fn echo_wet_adds_to_dry_without_replacing_it() {
        let echo = EchoSettings::new(true, 1.0, 0.01, 0.0); // 80 samples
        let mut chain = chain(2, ReverbSettings::default(), echo);

        let mut dry = vec![0.0; 200];
        dry[0] = 1.0;
        let mut out = vec![0.0; 400];
        let _ = chain.process(&dry, &mut out);

        assert_eq!(out[0], 0.5);
        assert_eq!(out[1], 0.5);
        assert!((out[160] - 0.5).abs() < 1e-6);
        assert!((out[161] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reverb_wet_is_independent_of_echo() {
        let reverb = ReverbSettings::new(true, 0.5, 0.05);
        let mut chain = chain(2, reverb, EchoSettings::default());

        let dry = vec![0.2; 1_024];
        let mut out = vec![0.0; 2_048];
        let _ = chain.process(&dry, &mut out);

        // Left and right carry different reverb noise on top of identical dry.
        let differs = out
            .chunks_exact(2)
            .skip(REVERB_BLOCK)
            .any(|frame| frame[0] != frame[1]);
        assert!(differs);
        assert_eq!(chain.echo().wet_gain(), 0.0);
    }
}
