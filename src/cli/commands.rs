//! Subcommand handlers for probe and config actions.

use super::args::ConfigAction;
use crate::config::{default_path as get_config_path, Config};
use crate::console::ImageProtocol;
use crate::render::DEFAULT_COLUMNS;
use crate::scheduler::{DEFAULT_SAMPLE_WIDTH, DEFAULT_TEXT_CLEAR_THRESHOLD};
use crate::source::{probe_video, SourceError};

/// Print stream metadata for `input` to stdout.
pub fn probe(input: &str) -> Result<(), SourceError> {
    let info = probe_video(input)?;
    println!("{}", input);
    println!("  Resolution: {}x{}", info.width, info.height);
    if info.fps > 0.0 {
        println!("  Frame rate: {:.2} fps", info.fps);
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction) {
    let config_path = get_config_path();

    match action {
        ConfigAction::Show => {
            let config = match Config::load(Some(&config_path)) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            println!("Current configuration:");
            println!(
                "  Mode: {}",
                config.playback.mode.unwrap_or_default().name()
            );
            println!(
                "  Autoplay: {}",
                if config.playback.autoplay { "yes" } else { "no" }
            );
            println!(
                "  Loop: {}",
                if config.playback.looping { "yes" } else { "no" }
            );
            println!(
                "  Sample width: {}",
                config.image.sample_width.unwrap_or(DEFAULT_SAMPLE_WIDTH)
            );
            println!(
                "  Columns: {}",
                config.image.columns.unwrap_or(DEFAULT_COLUMNS)
            );
            println!(
                "  Protocol: {}",
                config
                    .image
                    .protocol
                    .unwrap_or(ImageProtocol::default())
                    .name()
            );
            println!(
                "  Text clear threshold: {} frames",
                config
                    .text
                    .clear_threshold
                    .unwrap_or(DEFAULT_TEXT_CLEAR_THRESHOLD)
            );
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => match Config::write_default(&config_path) {
            Ok(()) => println!("Created config file: {}", config_path.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Use 'console-mosaic config show' to view current settings.");
                std::process::exit(1);
            }
        },
    }
}
