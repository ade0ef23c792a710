//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Mode, Protocol};
use crate::scheduler::{CLEAR_THRESHOLD_RANGE, SAMPLE_WIDTH_RANGE};

/// Parse and validate the sample width (1-400 cells)
fn parse_sample_width(s: &str) -> Result<u32, String> {
    let width: u32 = s.parse().map_err(|_| format!("'{}' is not a valid width", s))?;
    if !SAMPLE_WIDTH_RANGE.contains(&width) {
        return Err(format!(
            "Sample width must be between {} and {}, got {}",
            SAMPLE_WIDTH_RANGE.start(),
            SAMPLE_WIDTH_RANGE.end(),
            width
        ));
    }
    Ok(width)
}

/// Parse and validate the clear threshold (1-100 frames)
fn parse_clear_threshold(s: &str) -> Result<u32, String> {
    let frames: u32 = s.parse().map_err(|_| format!("'{}' is not a valid frame count", s))?;
    if !CLEAR_THRESHOLD_RANGE.contains(&frames) {
        return Err(format!(
            "Clear threshold must be between {} and {} frames, got {}",
            CLEAR_THRESHOLD_RANGE.start(),
            CLEAR_THRESHOLD_RANGE.end(),
            frames
        ));
    }
    Ok(frames)
}

/// Play videos as colour mosaics in the terminal
#[derive(Parser, Debug)]
#[command(name = "console-mosaic")]
#[command(version, about = "Play videos as colour mosaics in the terminal", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Inline-image mosaic, 80 cells wide
    console-mosaic play movie.mp4 --width 80 --autoplay

    # Text cells, clearing every 10 frames, on a kitty terminal
    console-mosaic play movie.mp4 --mode text --clear-every 10

    # Show stream metadata
    console-mosaic probe movie.mp4

KEYS (while playing):
    Space  play/pause      i / t / m  image / text / toggle mode
    + / -  sample width    ] / [      clear threshold
    q      quit")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a video (or still image) in the terminal
    Play(PlayArgs),
    /// Print stream metadata for a video
    Probe {
        /// Video file or URL
        input: String,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug)]
pub struct PlayArgs {
    /// Video file, URL, or still image
    pub input: String,

    /// Output mode
    #[arg(long, short)]
    pub mode: Option<Mode>,

    /// Image mode sampling width in cells (1-400)
    #[arg(long, short, value_parser = parse_sample_width)]
    pub width: Option<u32>,

    /// Text mode: frames logged before the console is cleared (1-100)
    #[arg(long, value_parser = parse_clear_threshold)]
    pub clear_every: Option<u32>,

    /// Inline image protocol
    #[arg(long)]
    pub protocol: Option<Protocol>,

    /// On-screen width of Image mode output in terminal columns
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub columns: Option<u16>,

    /// Start playing immediately
    #[arg(long)]
    pub autoplay: bool,

    /// Restart the video when it ends
    #[arg(long = "loop")]
    pub looping: bool,

    /// Don't read the keyboard (implies --autoplay; Ctrl+C quits)
    #[arg(long)]
    pub no_input: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create default config file
    Init,
}
