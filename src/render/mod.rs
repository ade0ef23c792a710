//! Renderers turning an [`RgbaSample`](crate::mosaic::RgbaSample) into console entries.
//!
//! - [`ImageRenderer`] - enlarged colour blocks encoded as an inline PNG
//! - [`render_text`] - one background-coloured blank cell per pixel

mod image;
mod text;

pub use self::image::{encode_png, ImageRenderer, CELL_SIZE, DEFAULT_COLUMNS, LEADING_NEWLINES};
pub use self::text::{render_text, CELL_GLYPHS};

/// Errors that can occur while rendering a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] ::image::ImageError),

    #[error("Console write failed: {0}")]
    Io(#[from] std::io::Error),
}
