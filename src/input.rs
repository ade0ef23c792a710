//! Keyboard input handling.
//!
//! Key events are mapped to [`ControlEvent`]s, the abstract input port the
//! event loop consumes. Nothing downstream of this module sees crossterm types.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::scheduler::OutputMode;

/// Step applied to the sample width by `+`/`-`.
pub const WIDTH_STEP: i32 = 10;
/// Step applied to the clear threshold by `]`/`[`.
pub const THRESHOLD_STEP: i32 = 1;

/// A user intent, independent of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Toggle between playing and paused
    TogglePlayback,
    Play,
    Pause,
    /// Select an output mode
    SetMode(OutputMode),
    /// Switch to the other output mode
    ToggleMode,
    /// Change the Image mode sample width by a signed amount
    AdjustSampleWidth(i32),
    /// Change the Text mode clear threshold by a signed amount
    AdjustClearThreshold(i32),
    Quit,
}

/// Map a key press to a control event.
///
/// Bindings:
/// - Space: play/pause
/// - `i` / `t`: Image / Text mode, `m`: toggle mode
/// - `+` or `=` / `-`: sample width up / down
/// - `]` / `[`: clear threshold up / down
/// - `q`, Esc, Ctrl+C: quit
pub fn handle_key_event(event: KeyEvent) -> Option<ControlEvent> {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(ControlEvent::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char(' ') => Some(ControlEvent::TogglePlayback),
        KeyCode::Char('i') | KeyCode::Char('I') => Some(ControlEvent::SetMode(OutputMode::Image)),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(ControlEvent::SetMode(OutputMode::Text)),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(ControlEvent::ToggleMode),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(ControlEvent::AdjustSampleWidth(WIDTH_STEP)),
        KeyCode::Char('-') | KeyCode::Char('_') => {
            Some(ControlEvent::AdjustSampleWidth(-WIDTH_STEP))
        }
        KeyCode::Char(']') => Some(ControlEvent::AdjustClearThreshold(THRESHOLD_STEP)),
        KeyCode::Char('[') => Some(ControlEvent::AdjustClearThreshold(-THRESHOLD_STEP)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(ControlEvent::Quit),
        _ => None,
    }
}
