//! Text mode: a mosaic made purely of styled blank cells.

use crate::console::{CellStyle, ConsoleEntry, StyledText, STYLE_TOKEN};
use crate::mosaic::RgbaSample;

/// Glyphs following each style token. Two spaces make a roughly square cell.
pub const CELL_GLYPHS: &str = "  ";

/// Build one styled-text entry for `sample`.
///
/// Each row starts with a line break followed by one `%c  ` token per pixel;
/// the directives list one background per token, row-major. Returns `None`
/// for an empty sample.
pub fn render_text(sample: &RgbaSample) -> Option<ConsoleEntry> {
    if sample.is_empty() {
        return None;
    }

    let cells = (sample.width as usize) * (sample.height as usize);
    let token_len = STYLE_TOKEN.len() + CELL_GLYPHS.len();
    let mut format = String::with_capacity(cells * token_len + sample.height as usize);
    let mut directives = Vec::with_capacity(cells);

    for y in 0..sample.height {
        format.push('\n');
        for x in 0..sample.width {
            format.push_str(STYLE_TOKEN);
            format.push_str(CELL_GLYPHS);
            directives.push(CellStyle::new(sample.pixel(x, y)));
        }
    }

    Some(ConsoleEntry::Styled(StyledText { format, directives }))
}
