//! keys - play the synthesizer from the computer keyboard
//!
//! Run with: cargo run --features tui
//!
//! Set `KEYS_LOG=keys.log` (and optionally `RUST_LOG=debug`) to write the
//! library's log output to a file; the terminal belongs to the UI.

mod app;
mod keymap;
mod ui;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use saavy_keys::SynthConfig;

use app::KeysApp;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut app = KeysApp::open(SynthConfig::default()).wrap_err("failed to start audio")?;

    let mut terminal = ratatui::init();
    let res = app.run(&mut terminal);
    ratatui::restore();

    res
}

fn init_logging() -> EyreResult<()> {
    let Some(path) = std::env::var_os("KEYS_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.to_string_lossy()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
