//! Masked password entry on an interactive terminal

use std::io::Write;

use tracing::trace;
use zeroize::Zeroize;

use crate::console::{Keystroke, RawConsole, RawModeGuard};
use crate::error::{ErrorCategory, ErrorKind, PromptError, Result};
use crate::secret::SecretBuffer;

const ERASE: &[u8] = b"\x08 \x08";
const NEWLINE: &[u8] = b"\r\n";

/// Reads one line from a terminal with echo disabled, showing a mask
/// character per byte instead.
#[derive(Debug, Clone)]
pub struct TerminalReader {
    mask: char,
}

impl TerminalReader {
    pub fn new(mask: char) -> Self {
        Self { mask }
    }

    /// Reads keystrokes into `secret` until Enter.
    ///
    /// Editing is byte-level: a character is appended as its UTF-8 bytes and
    /// Backspace removes a single byte. Bytes past `secret.max_len()` are
    /// dropped without ending entry. The console is in raw mode only for the
    /// duration of this call, whatever the outcome.
    pub fn read<C, W>(
        &self,
        console: &mut C,
        display: &mut W,
        secret: &mut SecretBuffer,
    ) -> Result<()>
    where
        C: RawConsole + ?Sized,
        W: Write + ?Sized,
    {
        let mut console = RawModeGuard::acquire(console)
            .map_err(|e| PromptError::acquisition("failed to switch terminal to raw mode", e))?;

        let mut mask_buf = [0u8; 4];
        let mask: &str = self.mask.encode_utf8(&mut mask_buf);

        loop {
            let keystroke = console
                .read_keystroke()
                .map_err(|e| PromptError::acquisition("failed to read from terminal", e))?;

            match keystroke {
                Keystroke::Enter | Keystroke::Char('\n') | Keystroke::Char('\r') => {
                    display.write_all(NEWLINE).map_err(PromptError::display)?;
                    display.flush().map_err(PromptError::display)?;
                    return Ok(());
                }
                Keystroke::Backspace => {
                    if secret.remove_last() {
                        display.write_all(ERASE).map_err(PromptError::display)?;
                    }
                }
                Keystroke::Char(c) => {
                    let mut encoded = [0u8; 4];
                    let len = c.encode_utf8(&mut encoded).len();
                    let mut result = Ok(());
                    for &byte in &encoded[..len] {
                        if secret.append(byte) {
                            result = display.write_all(mask.as_bytes());
                            if result.is_err() {
                                break;
                            }
                        } else {
                            trace!("length limit reached, input dropped");
                        }
                    }
                    encoded.zeroize();
                    result.map_err(PromptError::display)?;
                }
                Keystroke::Interrupt => {
                    return Err(PromptError::with_kind(
                        ErrorCategory::User,
                        ErrorKind::Interrupted,
                        "password entry interrupted",
                    ));
                }
                Keystroke::EndOfInput => {
                    return Err(PromptError::with_kind(
                        ErrorCategory::User,
                        ErrorKind::AcquisitionFailed,
                        "end of input before password was entered",
                    ));
                }
                Keystroke::Ignored => {}
            }
            display.flush().map_err(PromptError::display)?;
        }
    }
}

impl Default for TerminalReader {
    fn default() -> Self {
        Self::new('*')
    }
}
