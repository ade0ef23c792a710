//! Image mode: nearest-neighbour block upscaling and PNG encoding.

use ::image::codecs::png::PngEncoder;
use ::image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::console::{ConsoleEntry, InlineImage};
use crate::mosaic::{display_rows, RgbaSample, DEFAULT_CHAR_ASPECT_RATIO};

use super::RenderError;

/// Side length in pixels of the square each sample cell is drawn as.
pub const CELL_SIZE: u32 = 8;

/// Blank lines written before each image to push older output out of view.
pub const LEADING_NEWLINES: usize = 3;

/// On-screen width of the image in terminal columns when none is configured.
pub const DEFAULT_COLUMNS: u16 = 64;

/// Draws samples as enlarged colour blocks on a reusable canvas.
#[derive(Debug)]
pub struct ImageRenderer {
    canvas: RgbaImage,
    columns: u16,
}

impl ImageRenderer {
    /// `columns` is the fixed on-screen width of every emitted image.
    pub fn new(columns: u16) -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
            columns: columns.max(1),
        }
    }

    /// Paint `sample` onto the canvas, each pixel as a `CELL_SIZE` square.
    ///
    /// The canvas is always exactly `(width * CELL_SIZE, height * CELL_SIZE)`.
    pub fn draw(&mut self, sample: &RgbaSample) -> &RgbaImage {
        let width = sample.width * CELL_SIZE;
        let height = sample.height * CELL_SIZE;
        if self.canvas.dimensions() != (width, height) {
            self.canvas = RgbaImage::new(width, height);
        }

        for y in 0..sample.height {
            for x in 0..sample.width {
                let color = Rgba(sample.pixel(x, y));
                for dy in 0..CELL_SIZE {
                    for dx in 0..CELL_SIZE {
                        self.canvas
                            .put_pixel(x * CELL_SIZE + dx, y * CELL_SIZE + dy, color);
                    }
                }
            }
        }
        &self.canvas
    }

    /// Draw, encode and wrap `sample` as an inline image entry.
    ///
    /// Returns `None` for an empty sample.
    pub fn render(&mut self, sample: &RgbaSample) -> Result<Option<ConsoleEntry>, RenderError> {
        if sample.is_empty() {
            return Ok(None);
        }

        let columns = self.columns;
        let canvas = self.draw(sample);
        let (pixel_width, pixel_height) = canvas.dimensions();
        let png = encode_png(canvas)?;

        Ok(Some(ConsoleEntry::Image(InlineImage {
            png,
            pixel_width,
            pixel_height,
            columns,
            rows: display_rows(columns, pixel_width, pixel_height, DEFAULT_CHAR_ASPECT_RATIO),
            leading_newlines: LEADING_NEWLINES,
        })))
    }
}

/// Encode an RGBA canvas as PNG.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(png)
}
