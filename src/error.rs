//! Top-level error type for the player.

use crate::config::ConfigError;
use crate::render::RenderError;
use crate::source::SourceError;

/// Anything that can end a playback session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}
