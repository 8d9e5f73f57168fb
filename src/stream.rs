//! Password entry from a non-interactive byte stream

use std::io::{self, Read};

use zeroize::Zeroize;

use crate::error::{PromptError, Result};
use crate::secret::SecretBuffer;

/// Reads one line from piped or redirected input.
///
/// Bytes are read one at a time so that nothing past the line terminator
/// is consumed; the rest of the stream is left for whoever reads it next.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamReader;

impl StreamReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads into `secret` until `\n`, `\r`, end of stream, or
    /// `secret.max_len()` bytes, whichever comes first. Any of these is a
    /// successful read; arbitrary bytes (not only UTF-8) are accepted.
    pub fn read<R: Read + ?Sized>(&self, input: &mut R, secret: &mut SecretBuffer) -> Result<()> {
        let mut byte = [0u8; 1];
        let result = loop {
            if secret.is_full() {
                break Ok(());
            }
            match input.read(&mut byte) {
                Ok(0) => break Ok(()),
                Ok(_) if byte[0] == b'\n' || byte[0] == b'\r' => break Ok(()),
                Ok(_) => {
                    let appended = secret.append(byte[0]);
                    debug_assert!(appended, "room was checked before reading");
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    break Err(PromptError::acquisition(
                        "failed to read password from input",
                        e,
                    ));
                }
            }
        };
        byte.zeroize();
        result
    }
}
