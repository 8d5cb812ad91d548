//! Text dumps over defmt
//!
//! The scheduler's diagnostic dumps write plain text; [`DefmtLines`]
//! buffers it and emits one defmt record per line.

use core::fmt::{self, Write};

use defmt::*;
use heapless::String;

/// Longest line emitted in one record; longer lines are split
const LINE_LEN: usize = 96;

/// `fmt::Write` sink that logs each completed line
pub struct DefmtLines {
    line: String<LINE_LEN>,
}

impl DefmtLines {
    pub const fn new() -> Self {
        Self { line: String::new() }
    }

    /// Emit the partial line, if any
    pub fn flush(&mut self) {
        if !self.line.is_empty() {
            info!("{=str}", self.line.as_str());
            self.line.clear();
        }
    }
}

impl Write for DefmtLines {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.flush();
            } else if self.line.push(c).is_err() {
                self.flush();
                // empty after flush, a single char always fits
                let _ = self.line.push(c);
            }
        }
        Ok(())
    }
}

impl Drop for DefmtLines {
    fn drop(&mut self) {
        self.flush();
    }
}
