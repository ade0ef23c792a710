//! Interactive terminal session: raw keys in, mosaic out, clean screen after.
//!
//! While a session is active the terminal is in raw mode with the cursor
//! hidden and line wrapping off, so over-wide text rows are cut at the edge
//! instead of spilling into the next line. Ending the session (normally, by
//! drop, or from the panic hook) erases the mosaic and restores all three.

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, DisableLineWrap, EnableLineWrap};
use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::inline_image::ImageProtocol;
use super::terminal::{CLEAR, RESET};

const INACTIVE: u8 = 0;
const ITERM: u8 = 1;
const KITTY: u8 = 2;

/// Protocol of the active session, or `INACTIVE`. Read by the panic hook.
static ACTIVE_SESSION: AtomicU8 = AtomicU8::new(INACTIVE);

fn encode_protocol(protocol: ImageProtocol) -> u8 {
    match protocol {
        ImageProtocol::Iterm => ITERM,
        ImageProtocol::Kitty => KITTY,
    }
}

fn decode_protocol(value: u8) -> Option<ImageProtocol> {
    match value {
        ITERM => Some(ImageProtocol::Iterm),
        KITTY => Some(ImageProtocol::Kitty),
        _ => None,
    }
}

/// Raw-mode playback session; the terminal is restored when it is dropped.
pub struct TerminalSession {
    protocol: ImageProtocol,
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode for playback with `protocol` images.
    ///
    /// # Errors
    /// Returns an error if stdin is not a terminal.
    pub fn enter(protocol: ImageProtocol) -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        ACTIVE_SESSION.store(encode_protocol(protocol), Ordering::SeqCst);
        crossterm::execute!(io::stdout(), Hide, DisableLineWrap)?;

        Ok(Self {
            protocol,
            active: true,
        })
    }

    /// End the session now; dropping afterwards is a no-op.
    pub fn exit(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        ACTIVE_SESSION.store(INACTIVE, Ordering::SeqCst);
        let mut stdout = io::stdout();
        write_restore(&mut stdout, self.protocol)?;
        disable_raw_mode()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// Write the sequences that undo a session: reset colours, erase placed
/// images and the mosaic, then show the cursor and re-enable wrapping.
pub(crate) fn write_restore<W: Write>(out: &mut W, protocol: ImageProtocol) -> io::Result<()> {
    out.write_all(RESET.as_bytes())?;
    out.write_all(protocol.erase_all().as_bytes())?;
    out.write_all(CLEAR.as_bytes())?;
    crossterm::queue!(out, Show, EnableLineWrap)?;
    out.flush()
}

/// Restore the terminal before the default panic message is printed.
fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if let Some(protocol) = decode_protocol(ACTIVE_SESSION.swap(INACTIVE, Ordering::SeqCst)) {
            let _ = write_restore(&mut io::stdout(), protocol);
            let _ = disable_raw_mode();
        }
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore_output(protocol: ImageProtocol) -> String {
        let mut out = Vec::new();
        write_restore(&mut out, protocol).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_restore_clears_mosaic_and_shows_cursor() {
        let out = restore_output(ImageProtocol::Iterm);
        assert!(out.starts_with(RESET));
        assert!(out.contains(CLEAR));
        assert!(out.contains("\x1b[?25h"));
        assert!(out.contains("\x1b[?7h"));
        assert!(!out.contains("\x1b_G"));
    }

    #[test]
    fn test_restore_erases_kitty_images_before_clear() {
        let out = restore_output(ImageProtocol::Kitty);
        let erase = out.find("\x1b_Ga=d\x1b\\").unwrap();
        let clear = out.find(CLEAR).unwrap();
        assert!(erase < clear);
    }

    #[test]
    fn test_protocol_round_trips_through_session_flag() {
        for protocol in [ImageProtocol::Iterm, ImageProtocol::Kitty] {
            assert_eq!(decode_protocol(encode_protocol(protocol)), Some(protocol));
        }
        assert_eq!(decode_protocol(INACTIVE), None);
    }

    #[test]
    fn test_session_enter_and_exit() {
        // Raw mode needs a real TTY; CI runs without one
        match TerminalSession::enter(ImageProtocol::Iterm) {
            Ok(mut session) => {
                assert_eq!(ACTIVE_SESSION.load(Ordering::SeqCst), ITERM);
                session.exit().unwrap();
                assert_eq!(ACTIVE_SESSION.load(Ordering::SeqCst), INACTIVE);
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }
}
