// Purpose: the audio-thread engine and its control handle.
// `SynthEngine` renders; `Controller` is the only way to change it.

pub mod controller;
pub mod scheduler;

use rand::{rngs::StdRng, SeedableRng};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use self::{controller::Controller, scheduler::TeardownScheduler};
use crate::{
    config::SynthConfig,
    graph::{chain::EffectsChain, node::RenderCtx, reverb::ReverbKernel},
    notes::NoteId,
    synth::{
        message::{Command, Garbage},
        poly::VoiceManager,
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Retired objects in flight back to the control side.
const GARBAGE_CAPACITY: usize = 16;

/*
Render Loop
===========

`process` cuts the host buffer into ticks and runs each one in three steps:

    ┌──────────────────────────────────────────────────────────────┐
    │ 1. drain the command queue (every pending operation lands)   │
    │ 2. render ≤ MAX_BLOCK_SIZE frames: voices → Σ → effects      │
    │ 3. advance the clock, tear down voices whose deadline passed │
    └──────────────────────────────────────────────────────────────┘

A tick never crosses a teardown deadline: it is shortened to end exactly on
the next one. A voice whose release finishes at frame N therefore leaves the
live set at frame N, neither earlier nor a block later.

The loop allocates nothing and frees nothing. Voices sit in fixed slots;
reverb kernels arrive prebuilt and leave through the garbage queue.
*/

pub struct SynthEngine {
    sample_rate: f32,
    channels: usize,
    voices: VoiceManager,
    effects: EffectsChain,
    teardown: TeardownScheduler,
    commands: Consumer<Command>,
    garbage: Producer<Garbage>,
    dry: Vec<f32>,
    clock: u64,
}

impl SynthEngine {
    /// Build an engine and the controller that drives it.
    ///
    /// The initial reverb kernel is generated here, so call this from the
    /// control side before moving the engine into the audio callback.
    pub fn new(config: SynthConfig) -> (Self, Controller) {
        let config = config.validated();
        let settings = config.settings;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let kernel = ReverbKernel::generate(
            settings.reverb.decay,
            config.sample_rate,
            config.channels,
            &mut rng,
        );

        let (command_tx, command_rx) = RingBuffer::new(config.command_capacity);
        let (garbage_tx, garbage_rx) = RingBuffer::new(GARBAGE_CAPACITY);

        let engine = Self {
            sample_rate: config.sample_rate,
            channels: config.channels,
            voices: VoiceManager::new(config.sample_rate, config.attack, config.release),
            effects: EffectsChain::new(
                config.sample_rate,
                config.channels,
                settings.master_volume,
                settings.reverb,
                Box::new(kernel),
                settings.echo,
            ),
            teardown: TeardownScheduler::new(),
            commands: command_rx,
            garbage: garbage_tx,
            dry: vec![0.0; MAX_BLOCK_SIZE],
            clock: 0,
        };

        let controller = Controller::new(
            command_tx,
            garbage_rx,
            settings,
            config.sample_rate,
            config.channels,
            rng,
        );

        (engine, controller)
    }

    /// Fill `out` with interleaved audio, `channels()` samples per frame.
    ///
    /// A trailing partial frame is zeroed.
    pub fn process(&mut self, out: &mut [f32]) {
        let channels = self.channels;
        let total_frames = out.len() / channels;
        out[total_frames * channels..].fill(0.0);

        let mut frames_written = 0;
        while frames_written < total_frames {
            self.drain_commands();

            let mut frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            if let Some(deadline) = self.teardown.next_deadline() {
                let until = deadline.saturating_sub(self.clock) as usize;
                if until > 0 {
                    frames = frames.min(until);
                }
            }

            let ctx = RenderCtx::new(self.sample_rate, self.clock);
            let dry = &mut self.dry[..frames];
            self.voices.render(dry, &ctx);

            let block = &mut out[frames_written * channels..(frames_written + frames) * channels];
            if let Some(kernel) = self.effects.process(dry, block) {
                self.dispose(kernel);
            }

            self.clock = ctx.end_frame(frames);
            frames_written += frames;

            let voices = &mut self.voices;
            self.teardown.drain_due(self.clock, |note| {
                voices.remove(note);
            });
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.pop() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        let now = self.clock;

        match command {
            Command::NoteOn {
                note,
                waveform,
                octave,
            } => {
                // Hard cut: the old voice and its pending teardown both go.
                self.teardown.cancel(note);
                self.voices.note_on(note, waveform, octave, now);
            }
            Command::NoteOff { note } => {
                if let Some(release) = self.voices.note_off(note) {
                    self.teardown.schedule(note, now + release as u64);
                }
            }
            Command::StopAll => {
                let teardown = &mut self.teardown;
                self.voices.release_all(|note, release| {
                    teardown.schedule(note, now + release as u64);
                });
            }
            Command::SetWaveform(waveform) => self.voices.set_waveform(waveform),
            Command::SetOctave(octave) => self.voices.set_octave(octave),
            Command::SetMasterVolume(level) => self.effects.set_master_volume(level),
            Command::SetReverb { settings, kernel } => {
                if let Some(old) = self.effects.set_reverb(settings, kernel) {
                    self.dispose(old);
                }
            }
            Command::SetEcho(settings) => self.effects.set_echo(settings),
        }
    }

    /// Hand a finished kernel back to the control side for freeing.
    fn dispose(&mut self, kernel: Box<ReverbKernel>) {
        if let Err(PushError::Full(garbage)) = self.garbage.push(Garbage::Kernel(kernel)) {
            // Control side is not collecting; freeing here is the last resort.
            drop(garbage);
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Frames rendered since creation.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Live voices, releasing ones included.
    pub fn voice_count(&self) -> usize {
        self.voices.count()
    }

    pub fn voice(&self, note: NoteId) -> Option<&Voice> {
        self.voices.voice(note)
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.voices()
    }

    /// Frame at which `note`'s voice is due to be torn down, if released.
    pub fn teardown_at(&self, note: NoteId) -> Option<u64> {
        self.teardown.deadline(note)
    }

    pub fn effects(&self) -> &EffectsChain {
        &self.effects
    }

    /// True once the controller has been dropped.
    pub fn is_orphaned(&self) -> bool {
        self.commands.is_abandoned()
    }
}
