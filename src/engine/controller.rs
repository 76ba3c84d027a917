use log::{debug, warn};
use rand::rngs::StdRng;
use rtrb::{Consumer, Producer, PushError};

use crate::{
    config::{clamp_unit, EchoSettings, ReverbSettings, SynthSettings},
    dsp::oscillator::Waveform,
    error::SynthError,
    graph::reverb::ReverbKernel,
    notes::{clamp_octave, NoteId},
    synth::message::{Command, Garbage},
};

/// Control surface of a running engine.
///
/// Every method turns one operation into one `Command` and queues it for the
/// audio side, which applies it at the start of its next tick. Methods take
/// `&mut self` and the type is not `Clone`: there is exactly one writer.
///
/// Out-of-range values are clamped, never rejected; `settings()` reports the
/// clamped value. The only error a setter returns is `QueueFull`, in which
/// case nothing was applied and the call may be retried.
pub struct Controller {
    commands: Producer<Command>,
    garbage: Consumer<Garbage>,
    settings: SynthSettings,
    sample_rate: f32,
    channels: usize,
    rng: StdRng,
}

impl Controller {
    pub(crate) fn new(
        commands: Producer<Command>,
        garbage: Consumer<Garbage>,
        settings: SynthSettings,
        sample_rate: f32,
        channels: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            commands,
            garbage,
            settings,
            sample_rate,
            channels,
            rng,
        }
    }

    /// Start `note` at `octave`, replacing any voice already playing it.
    pub fn note_on(
        &mut self,
        note: NoteId,
        waveform: Waveform,
        octave: i32,
    ) -> Result<(), SynthError> {
        let clamped = clamp_octave(octave);
        if clamped != octave {
            debug!("note {note}: octave {octave} clamped to {clamped}");
        }
        self.send(Command::NoteOn {
            note,
            waveform,
            octave: clamped,
        })
    }

    /// Release `note`. Does nothing on the audio side if it is not playing.
    pub fn note_off(&mut self, note: NoteId) -> Result<(), SynthError> {
        self.send(Command::NoteOff { note })
    }

    /// Release every playing note.
    pub fn stop_all(&mut self) -> Result<(), SynthError> {
        self.send(Command::StopAll)
    }

    /// Change the shape of every live voice.
    pub fn set_waveform(&mut self, waveform: Waveform) -> Result<(), SynthError> {
        self.send(Command::SetWaveform(waveform))?;
        self.settings.waveform = waveform;
        Ok(())
    }

    /// Retune every live voice to `octave`.
    pub fn set_octave(&mut self, octave: i32) -> Result<(), SynthError> {
        let clamped = clamp_octave(octave);
        log_clamp("octave", octave as f32, clamped as f32);

        self.send(Command::SetOctave(clamped))?;
        self.settings.octave = clamped;
        Ok(())
    }

    pub fn set_master_volume(&mut self, level: f32) -> Result<(), SynthError> {
        let clamped = clamp_unit(level);
        log_clamp("master volume", level, clamped);

        self.send(Command::SetMasterVolume(clamped))?;
        self.settings.master_volume = clamped;
        Ok(())
    }

    /// Update the reverb. A changed decay builds a new impulse response here,
    /// on the calling thread, and ships it with the settings.
    pub fn set_reverb(
        &mut self,
        enabled: bool,
        wet_level: f32,
        decay: f32,
    ) -> Result<(), SynthError> {
        let settings = ReverbSettings::new(enabled, wet_level, decay);
        log_clamp("reverb wet level", wet_level, settings.wet_level);
        log_clamp("reverb decay", decay, settings.decay);

        let kernel = if settings.decay != self.settings.reverb.decay {
            debug!(
                "regenerating reverb impulse response: {:.3}s, {} channel(s)",
                settings.decay, self.channels
            );
            Some(Box::new(ReverbKernel::generate(
                settings.decay,
                self.sample_rate,
                self.channels,
                &mut self.rng,
            )))
        } else {
            None
        };

        self.send(Command::SetReverb { settings, kernel })?;
        self.settings.reverb = settings;
        Ok(())
    }

    pub fn set_echo(
        &mut self,
        enabled: bool,
        wet_level: f32,
        delay_time: f32,
        feedback: f32,
    ) -> Result<(), SynthError> {
        let settings = EchoSettings::new(enabled, wet_level, delay_time, feedback);
        log_clamp("echo wet level", wet_level, settings.wet_level);
        log_clamp("echo delay time", delay_time, settings.delay_time);
        log_clamp("echo feedback", feedback, settings.feedback);

        self.send(Command::SetEcho(settings))?;
        self.settings.echo = settings;
        Ok(())
    }

    /// Current (clamped) value of every parameter.
    pub fn settings(&self) -> &SynthSettings {
        &self.settings
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Free resources the audio side has finished with. Called by every
    /// setter; call it directly when idle for long stretches.
    ///
    /// Returns the number of objects freed.
    pub fn collect_garbage(&mut self) -> usize {
        let mut freed = 0;
        while let Ok(garbage) = self.garbage.pop() {
            match garbage {
                Garbage::Kernel(kernel) => {
                    debug!("freeing retired reverb kernel ({:.3}s)", kernel.decay());
                    drop(kernel);
                }
            }
            freed += 1;
        }
        freed
    }

    /// True once the engine has been dropped.
    pub fn is_orphaned(&self) -> bool {
        self.commands.is_abandoned()
    }

    fn send(&mut self, command: Command) -> Result<(), SynthError> {
        self.collect_garbage();

        match self.commands.push(command) {
            Ok(()) => Ok(()),
            Err(PushError::Full(_)) => {
                warn!("command queue full, dropping control change");
                Err(SynthError::QueueFull)
            }
        }
    }
}

fn log_clamp(name: &str, requested: f32, applied: f32) {
    if requested != applied {
        debug!("{name} {requested} clamped to {applied}");
    }
}
