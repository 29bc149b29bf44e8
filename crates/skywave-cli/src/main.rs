//! Skywave — terminal internet radio
//!
//! Presets and settings live in a fixed-layout byte image; the control loop
//! polls the ICY client, the keyboard, and the save/display timers, and
//! draws a 20x4 character panel.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;

use skywave::audio::{AudioSink, NullSink, WriterSink};
use skywave::icy::IcyClient;
use skywave::net::TcpSocket;

use skywave_cli::config;
use skywave_cli::config::store::IMAGE_SIZE;
use skywave_cli::config::timers::TICK;
use skywave_cli::control::Controller;
use skywave_cli::data::{presets, ByteStore, FileStore};
use skywave_cli::error::{AppError, Result};
use skywave_cli::input::{InputDevice, KeyInput};
use skywave_cli::panel::TermPanel;

/// Terminal internet radio player.
///
/// Keys: Enter/space play, `s` stop, Tab/`m` toggle preset/volume selection,
/// Up/Down turn the dial, `q` quit.
#[derive(Parser)]
#[command(name = "skywave", version)]
struct Cli {
    /// Path to the preset/settings image (default: config directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Import presets from a JSON file into the image, then exit
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Select a preset slot at startup
    #[arg(long)]
    preset: Option<u8>,

    /// Volume as attenuation, 0 (loudest) to 100 (silent)
    #[arg(long)]
    volume: Option<u8>,

    /// Start playing immediately
    #[arg(long)]
    play: bool,

    /// Write received audio to this file (for an external decoder)
    #[arg(long, value_name = "FILE")]
    audio_out: Option<PathBuf>,
}

fn store_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.store {
        return Ok(path.clone());
    }
    dirs::config_dir()
        .map(|p| p.join(config::app::NAME).join(config::app::STORE_FILE))
        .ok_or_else(|| AppError::Config("could not determine config directory".to_string()))
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let path = store_path(&cli)?;
    let mut store = FileStore::open(&path, IMAGE_SIZE)?;

    if let Some(import) = &cli.import {
        let n = presets::import_file(&mut store, import)?;
        store.flush()?;
        eprintln!("imported {n} presets into {path:?}");
        return Ok(());
    }

    let sink: Box<dyn AudioSink> = match &cli.audio_out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::Config(format!("cannot create {path:?}: {e}")))?;
            Box::new(WriterSink::new(io::BufWriter::new(file)))
        }
        None => Box::new(NullSink::new()),
    };

    let radio = IcyClient::new(TcpSocket::new());
    let mut controller = Controller::new(radio, sink, store)?;

    if let Some(slot) = cli.preset {
        controller.select_preset(slot)?;
    }
    if let Some(volume) = cli.volume {
        controller.set_volume(volume);
    }
    if cli.play {
        controller.play();
    }

    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?.execute(Hide)?;

    let mut input = KeyInput::new();
    let mut panel = TermPanel::new(io::stdout());
    let result = control_loop(&mut controller, &mut input, &mut panel);

    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?.execute(Show)?;

    result
}

fn control_loop(
    controller: &mut Controller<TcpSocket, FileStore>,
    input: &mut KeyInput,
    panel: &mut TermPanel<io::Stdout>,
) -> Result<()> {
    while controller.running() {
        let event = input.poll()?;
        if let Some(rows) = controller.tick(event) {
            panel.render(&rows)?;
        }
        thread::sleep(TICK);
    }
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
