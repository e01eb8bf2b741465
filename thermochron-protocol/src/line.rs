//! Line assembly for the serial console
//!
//! Bytes arrive one at a time from the UART. [`LineBuffer`] collects them
//! until a CR or LF and hands back the completed line. Blank lines (and
//! the second half of a CRLF pair) are skipped silently.

use heapless::{String, Vec};

/// Longest accepted command line, terminator excluded
pub const MAX_LINE_LEN: usize = 64;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// The line exceeded the buffer and was discarded
    Overflow,
    /// The line was not valid UTF-8 and was discarded
    InvalidUtf8,
}

/// Accumulates bytes into lines of at most `N` bytes
#[derive(Debug, Clone, Default)]
pub struct LineBuffer<const N: usize = MAX_LINE_LEN> {
    buffer: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty
    /// line, `Ok(None)` when more bytes are needed, or `Err` when the
    /// completed line had to be discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<N>>, LineError> {
        match byte {
            b'\r' | b'\n' => {
                if self.overflowed {
                    self.reset();
                    return Err(LineError::Overflow);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }

                let bytes = core::mem::take(&mut self.buffer);
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| LineError::InvalidUtf8)
            }
            BACKSPACE | DELETE => {
                if !self.overflowed {
                    self.buffer.pop();
                }
                Ok(None)
            }
            _ => {
                if self.buffer.push(byte).is_err() {
                    // Keep swallowing until the terminator, then report once
                    self.overflowed = true;
                }
                Ok(None)
            }
        }
    }
}
