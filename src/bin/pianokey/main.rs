//! pianokey - play a one-octave piano from the terminal
//!
//! Run with: cargo run --bin pianokey -- [--keymap keys.toml] [--log-file pianokey.log]

mod app;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use piano_key::{Keymap, MonoEngine};
use tracing_subscriber::EnvFilter;

use app::App;

#[derive(Debug, Parser)]
#[command(name = "pianokey", version, about = "A monophonic piano keyboard in the terminal")]
struct Args {
    /// TOML key map with one [[key]] table per piano key
    #[arg(long, value_name = "PATH")]
    keymap: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Stdout belongs to the TUI, so logs only go to a file
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let keymap = match &args.keymap {
        Some(path) => Keymap::load(path)
            .wrap_err_with(|| format!("failed to load key map {}", path.display()))?,
        None => Keymap::default(),
    };
    tracing::info!(keys = keymap.len(), "key map ready");

    let engine = MonoEngine::with_default_output();
    let mut terminal = ratatui::init();
    let result = App::new(keymap, engine).run(&mut terminal);
    ratatui::restore();
    result
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
