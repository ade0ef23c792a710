use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use tokio::sync::mpsc;

use console_mosaic::cli::{self, Args, Command, PlaySettings};
use console_mosaic::config::Config;
use console_mosaic::console::{TerminalConsole, TerminalSession};
use console_mosaic::error::AppError;
use console_mosaic::event_loop;
use console_mosaic::input::ControlEvent;
use console_mosaic::scheduler::Scheduler;
use console_mosaic::source::{
    is_still_image, DecoderSettings, FfmpegSource, PlaybackSource, SourceEvent, StillSource,
};

/// Load `.env`, then start logging to stderr (RUST_LOG, default `warn`).
fn init_logging() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn main() {
    init_logging();
    log::info!("console-mosaic {} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match args.command {
        Command::Play(play_args) => {
            // An explicit --config must exist; the default path falls back to defaults
            let config = match play_args.config.as_deref() {
                Some(path) => Config::load_from(path),
                None => Config::load(None).or_else(|e| {
                    eprintln!("Warning: Failed to load config file: {}", e);
                    eprintln!("Using default settings.\n");
                    Ok(Config::default())
                }),
            };
            let config = match config {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let settings = PlaySettings::resolve(&play_args, &config);
            if let Err(e) = run_play(settings) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Probe { input } => {
            if let Err(e) = cli::probe(&input) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Config { action } => cli::handle_config_action(action),
    }
}

/// Open the source and drive playback until the user quits.
fn run_play(settings: PlaySettings) -> Result<(), AppError> {
    log::info!(
        "Playing {} (mode: {}, sample width: {}, protocol: {})",
        settings.input,
        settings.mode.name(),
        settings.sample_width,
        settings.protocol.name()
    );

    let (source_tx, source_rx) = mpsc::unbounded_channel::<SourceEvent>();
    let mut source: Box<dyn PlaybackSource> = if is_still_image(Path::new(&settings.input)) {
        Box::new(StillSource::open(Path::new(&settings.input))?)
    } else {
        Box::new(FfmpegSource::open(
            DecoderSettings {
                input: settings.input.clone(),
                looping: settings.looping,
            },
            source_tx,
        )?)
    };

    let mut scheduler = Scheduler::new(settings.render_state(), settings.columns);
    let mut console = TerminalConsole::stdout(settings.protocol);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(play_session(
        source.as_mut(),
        &mut scheduler,
        &mut console,
        source_rx,
        &settings,
    ))
}

/// Wire the input port to the event loop and run it.
async fn play_session(
    source: &mut dyn PlaybackSource,
    scheduler: &mut Scheduler,
    console: &mut TerminalConsole<std::io::Stdout>,
    source_rx: mpsc::UnboundedReceiver<SourceEvent>,
    settings: &PlaySettings,
) -> Result<(), AppError> {
    let (control_tx, control_rx) = mpsc::unbounded_channel::<ControlEvent>();

    let interactive = settings.interactive && std::io::stdin().is_terminal();
    let _session = if interactive {
        let session = TerminalSession::enter(settings.protocol)?;
        event_loop::spawn_keyboard_reader(control_tx.clone());
        Some(session)
    } else {
        if settings.interactive {
            log::warn!("stdin is not a terminal, keyboard controls disabled");
        }
        event_loop::install_ctrlc_handler(control_tx.clone())
            .map_err(|e| AppError::Playback(format!("Failed to set Ctrl+C handler: {}", e)))?;
        None
    };

    if settings.autoplay || !interactive {
        let _ = control_tx.send(ControlEvent::Play);
    }

    event_loop::run(source, scheduler, console, control_rx, source_rx).await
}
