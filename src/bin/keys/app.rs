//! Keys - the application loop tying keyboard, synthesizer and display together

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;
use ratatui::DefaultTerminal;
use rtrb::{Consumer, RingBuffer};
use saavy_keys::{io::device::OutputStream, Controller, NoteId, SynthConfig, SynthError};

use crate::{
    keymap::{self, Action},
    ui::{self, spectrum::SpectrumAnalyzer, View},
};

/// Samples shown by the oscilloscope and analysed by the spectrum
const VIS_BUFFER_SIZE: usize = 1024;
/// Capacity in blocks for the audio → UI ring
const AUDIO_RING_BLOCKS: usize = 16;
/// Most terminals never report key releases: a note is released this long
/// after its last press or auto-repeat.
const AUTO_RELEASE: Duration = Duration::from_millis(250);

const VOLUME_STEP: f32 = 0.05;
const DECAY_STEP: f32 = 0.5;
const DELAY_STEP: f32 = 0.05;

pub struct KeysApp {
    controller: Controller,
    output: OutputStream,
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    /// Auto-release deadline of each held note
    held: [Option<Instant>; NoteId::COUNT],
    message: Option<String>,
    should_quit: bool,
}

impl KeysApp {
    /// Open the default output device and build the synthesizer on it.
    pub fn open(config: SynthConfig) -> Result<Self, SynthError> {
        let (audio_tx, audio_rx) = RingBuffer::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
        let (output, controller) = OutputStream::open(config, Some(audio_tx))?;
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, output.sample_rate());

        Ok(Self {
            controller,
            output,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            held: [None; NoteId::COUNT],
            message: None,
            should_quit: false,
        })
    }

    /// Run the UI event loop until quit
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.release_expired(Instant::now());
            self.controller.collect_garbage();

            terminal.draw(|frame| ui::render(frame, &self.view()))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => self.handle_press(key.code),
                        KeyEventKind::Release => self.handle_release(key.code),
                    }
                }
            }
        }

        // Let the tails ring out cleanly rather than cutting mid-note.
        if let Err(err) = self.controller.stop_all() {
            warn!("stop on exit failed: {err}");
        }
        Ok(())
    }

    /// Pull new monitor samples, keeping the last VIS_BUFFER_SIZE
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if !received {
            return;
        }

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }

        self.spectrum.update(&self.audio_buffer);
    }

    fn handle_press(&mut self, key: KeyCode) {
        let Some(action) = keymap::action_for(key) else {
            return;
        };

        let settings = *self.controller.settings();
        let reverb = settings.reverb;
        let echo = settings.echo;

        let result = match action {
            Action::Note(note) => self.press_note(note),
            Action::OctaveDown => self.controller.set_octave(settings.octave - 1),
            Action::OctaveUp => self.controller.set_octave(settings.octave + 1),
            Action::Waveform(waveform) => self.controller.set_waveform(waveform),
            Action::VolumeDown => self
                .controller
                .set_master_volume(settings.master_volume - VOLUME_STEP),
            Action::VolumeUp => self
                .controller
                .set_master_volume(settings.master_volume + VOLUME_STEP),
            Action::ToggleReverb => {
                self.controller
                    .set_reverb(!reverb.enabled, reverb.wet_level, reverb.decay)
            }
            Action::ReverbShorter => self.controller.set_reverb(
                reverb.enabled,
                reverb.wet_level,
                reverb.decay - DECAY_STEP,
            ),
            Action::ReverbLonger => self.controller.set_reverb(
                reverb.enabled,
                reverb.wet_level,
                reverb.decay + DECAY_STEP,
            ),
            Action::ToggleEcho => self.controller.set_echo(
                !echo.enabled,
                echo.wet_level,
                echo.delay_time,
                echo.feedback,
            ),
            Action::EchoShorter => self.controller.set_echo(
                echo.enabled,
                echo.wet_level,
                echo.delay_time - DELAY_STEP,
                echo.feedback,
            ),
            Action::EchoLonger => self.controller.set_echo(
                echo.enabled,
                echo.wet_level,
                echo.delay_time + DELAY_STEP,
                echo.feedback,
            ),
            Action::StopAll => {
                self.held = [None; NoteId::COUNT];
                self.controller.stop_all()
            }
            Action::Quit => {
                self.should_quit = true;
                Ok(())
            }
        };

        self.report(result);
    }

    /// Auto-repeat of a held key only pushes its release back.
    fn press_note(&mut self, note: NoteId) -> Result<(), SynthError> {
        let deadline = Instant::now() + AUTO_RELEASE;
        let slot = &mut self.held[note.index()];
        if slot.is_some() {
            *slot = Some(deadline);
            return Ok(());
        }

        let settings = *self.controller.settings();
        self.controller
            .note_on(note, settings.waveform, settings.octave)?;
        self.held[note.index()] = Some(deadline);
        Ok(())
    }

    fn handle_release(&mut self, key: KeyCode) {
        if let Some(Action::Note(note)) = keymap::action_for(key) {
            if self.held[note.index()].take().is_some() {
                let result = self.controller.note_off(note);
                self.report(result);
            }
        }
    }

    fn release_expired(&mut self, now: Instant) {
        for note in NoteId::ALL {
            let expired = self.held[note.index()].is_some_and(|deadline| deadline <= now);
            if expired {
                self.held[note.index()] = None;
                let result = self.controller.note_off(note);
                self.report(result);
            }
        }
    }

    fn report(&mut self, result: Result<(), SynthError>) {
        match result {
            Ok(()) => self.message = None,
            Err(err) => {
                warn!("{err}");
                self.message = Some(err.to_string());
            }
        }
    }

    fn view(&self) -> View<'_> {
        View {
            settings: self.controller.settings(),
            held: self.held.map(|deadline| deadline.is_some()),
            audio: &self.audio_buffer,
            spectrum: self.spectrum.data(),
            device: self.output.device_name(),
            sample_rate: self.output.sample_rate(),
            message: self.message.as_deref(),
        }
    }
}
