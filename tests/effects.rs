use saavy_keys::{
    io::AudioOutput, Controller, NoteId, ReverbSettings, SynthConfig, SynthEngine, Waveform,
};

const SR: f32 = 8_000.0;

fn engine(seed: u64) -> (SynthEngine, Controller) {
    SynthEngine::new(
        SynthConfig::default()
            .sample_rate(SR)
            .channels(2)
            .reverb(ReverbSettings::new(false, 0.3, 0.3))
            .seed(seed),
    )
}

fn render(engine: &mut SynthEngine, frames: usize) -> Vec<f32> {
    let mut buf = vec![0.0; frames * engine.channels()];
    engine.process(&mut buf);
    buf
}

#[test]
fn reverb_toggle_restores_wet_level_exactly() {
    let (mut engine, mut ctl) = engine(1);
    ctl.set_reverb(true, 0.4, 0.3).unwrap();
    render(&mut engine, 800);
    assert_eq!(engine.effects().reverb().wet_gain(), 0.4);

    ctl.set_reverb(false, 0.4, 0.3).unwrap();
    assert_eq!(ctl.settings().reverb.wet_level, 0.4);
    render(&mut engine, 800);
    assert_eq!(engine.effects().reverb().wet_gain(), 0.0);
    assert!(engine.effects().reverb().is_bypassed());

    ctl.set_reverb(true, 0.4, 0.3).unwrap();
    render(&mut engine, 800);
    assert_eq!(engine.effects().reverb().wet_gain(), 0.4);
    assert!(!engine.effects().reverb().is_bypassed());
}

#[test]
fn echo_toggle_restores_wet_level_exactly() {
    let (mut engine, mut ctl) = engine(1);
    ctl.set_echo(true, 0.5, 0.1, 0.3).unwrap();
    render(&mut engine, 800);
    assert_eq!(engine.effects().echo().wet_gain(), 0.5);

    ctl.set_echo(false, 0.5, 0.1, 0.3).unwrap();
    render(&mut engine, 800);
    assert_eq!(engine.effects().echo().wet_gain(), 0.0);

    ctl.set_echo(true, 0.5, 0.1, 0.3).unwrap();
    render(&mut engine, 800);
    assert_eq!(engine.effects().echo().wet_gain(), 0.5);
    assert_eq!(ctl.settings().echo.wet_level, 0.5);
}

#[test]
fn toggled_off_effects_leave_the_dry_path_untouched() {
    let (mut toggled, mut ctl_a) = engine(9);
    let (mut plain, mut ctl_b) = engine(9);

    ctl_a.set_reverb(true, 1.0, 0.3).unwrap();
    ctl_a.set_echo(true, 1.0, 0.05, 0.9).unwrap();
    assert_eq!(render(&mut toggled, 400), render(&mut plain, 400));

    ctl_a.set_reverb(false, 1.0, 0.3).unwrap();
    ctl_a.set_echo(false, 1.0, 0.05, 0.9).unwrap();
    render(&mut toggled, 400);
    render(&mut plain, 400);

    for ctl in [&mut ctl_a, &mut ctl_b] {
        ctl.note_on(NoteId::C, Waveform::Sawtooth, 4).unwrap();
        ctl.note_on(NoteId::G, Waveform::Sawtooth, 4).unwrap();
    }
    let a = render(&mut toggled, 4_000);
    let b = render(&mut plain, 4_000);
    assert!(a.iter().any(|&s| s != 0.0));
    assert_eq!(a, b);
}

#[test]
fn enabled_effects_only_add_to_the_dry_signal() {
    let (mut wet, mut ctl_a) = engine(4);
    let (mut dry, mut ctl_b) = engine(4);
    ctl_a.set_echo(true, 1.0, 0.05, 0.5).unwrap();

    for ctl in [&mut ctl_a, &mut ctl_b] {
        ctl.note_on(NoteId::A, Waveform::Sine, 4).unwrap();
    }
    // Before the first echo arrives (400 frames), the outputs are identical.
    let a = render(&mut wet, 399);
    let b = render(&mut dry, 399);
    assert_eq!(a, b);

    let a = render(&mut wet, 400);
    let b = render(&mut dry, 400);
    assert_ne!(a, b);
}

#[test]
fn decay_change_returns_old_kernels_through_the_garbage_queue() {
    let (mut engine, mut ctl) = engine(2);

    // Bypassed reverb: the displaced kernel is released right away.
    ctl.set_reverb(true, 0.5, 0.2).unwrap();
    render(&mut engine, 64);
    assert_eq!(engine.effects().reverb().kernel().decay(), 0.2);
    assert_eq!(ctl.collect_garbage(), 1);

    ctl.note_on(NoteId::E, Waveform::Square, 4).unwrap();
    render(&mut engine, 800);

    // Running reverb: the old kernel finishes its tail first.
    ctl.set_reverb(true, 0.5, 0.4).unwrap();
    render(&mut engine, 64);
    assert!(engine.effects().reverb().is_retiring());
    assert_eq!(engine.effects().reverb().kernel().decay(), 0.4);
    assert_eq!(ctl.collect_garbage(), 0);

    render(&mut engine, 4_000);
    assert!(!engine.effects().reverb().is_retiring());
    assert_eq!(ctl.collect_garbage(), 1);
}

#[test]
fn unchanged_decay_reuses_the_kernel() {
    let (mut engine, mut ctl) = engine(2);
    ctl.set_reverb(true, 0.2, 0.3).unwrap();
    ctl.set_reverb(true, 0.8, 0.3).unwrap();
    render(&mut engine, 64);

    assert!(!engine.effects().reverb().is_retiring());
    assert_eq!(ctl.collect_garbage(), 0);
}

#[test]
fn same_seed_same_operations_same_output() {
    let run = || {
        let (mut engine, mut ctl) = engine(77);
        let mut output = AudioOutput::for_engine(&engine).block_frames(128);

        ctl.set_reverb(true, 0.6, 0.5).unwrap();
        ctl.set_echo(true, 0.4, 0.08, 0.6).unwrap();
        ctl.note_on(NoteId::D, Waveform::Triangle, 3).unwrap();
        output.render(&mut engine, 1_000);
        ctl.note_on(NoteId::Fs, Waveform::Square, 3).unwrap();
        ctl.set_reverb(true, 0.6, 0.7).unwrap();
        output.render(&mut engine, 1_000);
        ctl.stop_all().unwrap();
        output.render(&mut engine, 6_000);

        output.samples().to_vec()
    };

    let first = run();
    assert!(first.iter().any(|&s| s != 0.0));
    assert_eq!(first, run());
}

#[test]
fn different_seeds_give_different_reverb() {
    let run = |seed| {
        let (mut engine, mut ctl) = engine(seed);
        ctl.set_reverb(true, 1.0, 0.3).unwrap();
        ctl.note_on(NoteId::C, Waveform::Sine, 4).unwrap();
        render(&mut engine, 2_000)
    };
    assert_ne!(run(1), run(2));
}

#[test]
fn echo_feedback_is_clamped_and_repeats_decay() {
    let (mut engine, mut ctl) = SynthEngine::new(
        SynthConfig::default()
            .sample_rate(48_000.0)
            .channels(1)
            .attack(0.002)
            .release(0.005)
            .seed(11),
    );
    let period = 2_400; // 50 ms

    ctl.set_echo(true, 1.0, 0.05, 1.5).unwrap();
    assert_eq!(ctl.settings().echo.feedback, 0.95);

    // Let the wet and feedback ramps settle before any sound enters the loop.
    render(&mut engine, period);
    assert_eq!(engine.effects().echo().feedback_gain(), 0.95);

    ctl.note_on(NoteId::A, Waveform::Sine, 4).unwrap();
    render(&mut engine, 480);
    ctl.note_off(NoteId::A).unwrap();
    render(&mut engine, period - 480);
    assert_eq!(engine.voice_count(), 0);

    // From here on the loop holds only recirculated sound.
    render(&mut engine, period);
    let out = render(&mut engine, period * 20);
    let energies: Vec<f64> = out
        .chunks(period)
        .map(|p| p.iter().map(|&s| (s as f64) * (s as f64)).sum())
        .collect();

    assert!(energies[0] > 0.0);
    for pair in energies.windows(2) {
        assert!(
            pair[1] <= pair[0] * (1.0 + 1e-6),
            "energy grew: {} → {}",
            pair[0],
            pair[1]
        );
    }
    assert!(energies[19] < energies[0] * 0.5);
}
