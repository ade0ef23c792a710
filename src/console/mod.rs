//! Console output: the sink rendered frames are logged to.
//!
//! A [`Console`] accepts whole entries, mirroring a developer console's
//! `log`/`clear` pair. [`TerminalConsole`] turns entries into ANSI and
//! inline-image escape sequences; [`MemoryConsole`] just records them.

mod inline_image;
mod memory;
mod session;
mod terminal;

use std::io;

pub use inline_image::{iterm_sequence, kitty_sequence, ImageProtocol, KITTY_CHUNK_SIZE};
pub use memory::MemoryConsole;
pub use session::TerminalSession;
pub use terminal::TerminalConsole;

/// Placeholder in [`StyledText::format`] consumed by one [`CellStyle`] directive.
pub const STYLE_TOKEN: &str = "%c";

/// Background directive for one styled token.
///
/// The token's glyphs are always drawn with a transparent foreground, so
/// only the background shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    /// RGBA background
    pub background: [u8; 4],
}

impl CellStyle {
    pub fn new(background: [u8; 4]) -> Self {
        Self { background }
    }

    /// Background colour composited over black, since terminals have no alpha.
    pub fn opaque_rgb(&self) -> (u8, u8, u8) {
        let [r, g, b, a] = self.background;
        let blend = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        (blend(r), blend(g), blend(b))
    }

    /// ANSI true colour (24-bit) background sequence.
    pub fn ansi(&self) -> String {
        let (r, g, b) = self.opaque_rgb();
        format!("\x1b[48;2;{};{};{}m", r, g, b)
    }
}

/// Format string plus the ordered directives that style its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    pub format: String,
    pub directives: Vec<CellStyle>,
}

impl StyledText {
    /// Number of style tokens in the format string.
    pub fn token_count(&self) -> usize {
        self.format.matches(STYLE_TOKEN).count()
    }
}

/// A PNG displayed inline at a fixed on-screen size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Encoded PNG bytes
    pub png: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// On-screen width in terminal cells
    pub columns: u16,
    /// On-screen height in terminal cells
    pub rows: u16,
    /// Blank lines written before the image
    pub leading_newlines: usize,
}

/// One console log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEntry {
    Text(String),
    Styled(StyledText),
    Image(InlineImage),
}

/// Output sink with developer-console semantics.
pub trait Console {
    /// Wipe everything logged so far.
    fn clear(&mut self) -> io::Result<()>;

    /// Append one entry.
    fn log(&mut self, entry: ConsoleEntry) -> io::Result<()>;
}
