//! CLI enum types for output mode and image protocol options.

use clap::ValueEnum;

use crate::console::ImageProtocol;
use crate::scheduler::OutputMode;

/// How frames are written to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Inline PNG of enlarged colour blocks
    #[default]
    Image,
    /// Background-coloured text cells
    Text,
}

impl From<Mode> for OutputMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Image => OutputMode::Image,
            Mode::Text => OutputMode::Text,
        }
    }
}

/// Inline image protocol for Image mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Protocol {
    /// iTerm2 OSC 1337 (iTerm2, WezTerm, mintty, Konsole)
    #[default]
    Iterm,
    /// kitty graphics protocol (kitty, Ghostty, WezTerm)
    Kitty,
}

impl From<Protocol> for ImageProtocol {
    fn from(p: Protocol) -> Self {
        match p {
            Protocol::Iterm => ImageProtocol::Iterm,
            Protocol::Kitty => ImageProtocol::Kitty,
        }
    }
}
