//! Dimension calculations for sampling and display.

/// Terminal character aspect ratio (cells are ~2x taller than wide).
pub const DEFAULT_CHAR_ASPECT_RATIO: f32 = 2.0;

/// Sampling width used in Text mode, independent of the width control.
pub const TEXT_SAMPLE_WIDTH: u32 = 40;

/// Largest sample side, in cells. Anything taller is treated as degenerate.
pub const MAX_SAMPLE_SIDE: u32 = 400;

/// Clamp a requested sampling width to `1..=MAX_SAMPLE_SIDE` cells.
pub fn clamp_sample_width(width: u32) -> u32 {
    width.clamp(1, MAX_SAMPLE_SIDE)
}

/// Height of the sample grid for a given width, preserving the source aspect ratio.
///
/// Returns `round(width * source_height / source_width)`. A source without
/// dimensions (metadata not loaded yet), or one so tall that the height would
/// exceed [`MAX_SAMPLE_SIDE`], yields 0.
///
/// # Example
/// ```ignore
/// // 16:9 source sampled 40 cells wide
/// assert_eq!(sample_height(40, 1920, 1080), 23);
/// ```
pub fn sample_height(width: u32, source_width: u32, source_height: u32) -> u32 {
    if source_width == 0 || source_height == 0 {
        return 0;
    }
    let height = (width as f64 * source_height as f64 / source_width as f64).round();
    if height > MAX_SAMPLE_SIDE as f64 {
        return 0;
    }
    height as u32
}

/// Number of terminal rows an image `columns` wide occupies, preserving its aspect ratio.
///
/// # Arguments
/// * `columns` - On-screen width in terminal cells
/// * `pixel_width` - Width of the image in pixels
/// * `pixel_height` - Height of the image in pixels
/// * `char_aspect` - Terminal cell aspect ratio (height/width, typically ~2.0)
pub fn display_rows(columns: u16, pixel_width: u32, pixel_height: u32, char_aspect: f32) -> u16 {
    if columns == 0 || pixel_width == 0 || pixel_height == 0 || char_aspect <= 0.0 {
        return 0;
    }
    let rows = (columns as f32 * pixel_height as f32 / pixel_width as f32 / char_aspect).round();
    (rows as u16).max(1)
}
