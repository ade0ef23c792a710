//! Merge `play` flags with the config file into the settings a session runs with.
//!
//! Precedence: CLI flag > config file > built-in default.

use super::args::PlayArgs;
use crate::config::Config;
use crate::console::ImageProtocol;
use crate::render::DEFAULT_COLUMNS;
use crate::scheduler::{
    OutputMode, RenderState, CLEAR_THRESHOLD_RANGE, DEFAULT_SAMPLE_WIDTH,
    DEFAULT_TEXT_CLEAR_THRESHOLD, SAMPLE_WIDTH_RANGE,
};

/// Fully resolved options for one playback session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaySettings {
    pub input: String,
    pub mode: OutputMode,
    pub sample_width: u32,
    pub clear_threshold: u32,
    pub protocol: ImageProtocol,
    pub columns: u16,
    pub autoplay: bool,
    pub looping: bool,
    /// Read keys from the terminal; off for `--no-input`
    pub interactive: bool,
}

impl PlaySettings {
    pub fn resolve(args: &PlayArgs, config: &Config) -> Self {
        let sample_width = args
            .width
            .or(config.image.sample_width)
            .unwrap_or(DEFAULT_SAMPLE_WIDTH)
            .clamp(*SAMPLE_WIDTH_RANGE.start(), *SAMPLE_WIDTH_RANGE.end());
        let clear_threshold = args
            .clear_every
            .or(config.text.clear_threshold)
            .unwrap_or(DEFAULT_TEXT_CLEAR_THRESHOLD)
            .clamp(*CLEAR_THRESHOLD_RANGE.start(), *CLEAR_THRESHOLD_RANGE.end());

        Self {
            input: args.input.clone(),
            mode: args
                .mode
                .map(OutputMode::from)
                .or(config.playback.mode)
                .unwrap_or_default(),
            sample_width,
            clear_threshold,
            protocol: args
                .protocol
                .map(ImageProtocol::from)
                .or(config.image.protocol)
                .unwrap_or_default(),
            columns: args
                .columns
                .or(config.image.columns)
                .unwrap_or(DEFAULT_COLUMNS)
                .max(1),
            autoplay: args.autoplay || args.no_input || config.playback.autoplay,
            looping: args.looping || config.playback.looping,
            interactive: !args.no_input,
        }
    }

    /// Initial render state; the counter starts at 0 so the first frame clears.
    pub fn render_state(&self) -> RenderState {
        RenderState {
            output_mode: self.mode,
            sample_width: self.sample_width,
            text_clear_threshold: self.clear_threshold,
            frames_since_clear: 0,
        }
    }
}
