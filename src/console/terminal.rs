//! Terminal-backed console.
//!
//! Entries are turned into one string of ANSI escape codes and written in a
//! single call to keep flicker down. Line breaks are emitted as `\r\n` so
//! output stays aligned while the terminal is in raw mode.

use std::io::{self, Write};

use super::inline_image::ImageProtocol;
use super::{Console, ConsoleEntry, StyledText, STYLE_TOKEN};

pub(crate) const RESET: &str = "\x1b[0m";
/// Clear screen, clear scrollback, cursor home.
pub(crate) const CLEAR: &str = "\x1b[2J\x1b[3J\x1b[H";

/// Console that draws into a terminal.
pub struct TerminalConsole<W: Write> {
    out: W,
    protocol: ImageProtocol,
}

impl TerminalConsole<io::Stdout> {
    /// Console on the process's stdout.
    pub fn stdout(protocol: ImageProtocol) -> Self {
        Self::new(io::stdout(), protocol)
    }
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W, protocol: ImageProtocol) -> Self {
        Self { out, protocol }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_flush(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.write_flush(CLEAR)
    }

    fn log(&mut self, entry: ConsoleEntry) -> io::Result<()> {
        let mut output = String::new();
        match &entry {
            ConsoleEntry::Text(text) => push_plain(&mut output, text),
            ConsoleEntry::Styled(styled) => render_styled(&mut output, styled),
            ConsoleEntry::Image(image) => {
                for _ in 0..image.leading_newlines {
                    output.push_str("\r\n");
                }
                output.push_str(&self.protocol.encode(image));
            }
        }
        output.push_str(RESET);
        output.push_str("\r\n");
        self.write_flush(&output)
    }
}

/// Append `text`, resetting attributes before every line break.
fn push_plain(output: &mut String, text: &str) {
    for c in text.chars() {
        if c == '\n' {
            output.push_str(RESET);
            output.push_str("\r\n");
        } else {
            output.push(c);
        }
    }
}

/// Substitute each style token with its directive's ANSI background.
///
/// Tokens without a matching directive render unstyled; surplus directives
/// are ignored.
pub(crate) fn render_styled(output: &mut String, styled: &StyledText) {
    let mut directives = styled.directives.iter();
    let mut parts = styled.format.split(STYLE_TOKEN);

    if let Some(head) = parts.next() {
        push_plain(output, head);
    }
    for part in parts {
        match directives.next() {
            Some(style) => output.push_str(&style.ansi()),
            None => output.push_str(RESET),
        }
        push_plain(output, part);
    }
}
