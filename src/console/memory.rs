//! In-memory console that records what was logged.

use std::io;

use super::{Console, ConsoleEntry};

/// Records entries and clears instead of drawing them.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    /// Entries logged since the last clear
    pub entries: Vec<ConsoleEntry>,
    /// Total entries ever logged
    pub total_logged: usize,
    /// Number of times [`Console::clear`] was called
    pub clears: usize,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image entries currently on screen.
    pub fn images(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, ConsoleEntry::Image(_)))
            .count()
    }

    /// Styled text entries currently on screen.
    pub fn styled(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, ConsoleEntry::Styled(_)))
            .count()
    }
}

impl Console for MemoryConsole {
    fn clear(&mut self) -> io::Result<()> {
        self.entries.clear();
        self.clears += 1;
        Ok(())
    }

    fn log(&mut self, entry: ConsoleEntry) -> io::Result<()> {
        self.entries.push(entry);
        self.total_logged += 1;
        Ok(())
    }
}
