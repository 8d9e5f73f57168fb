//! Raw terminal access
//!
//! [`RawConsole`] is the capability the terminal reader needs: an
//! interactivity test, switching echo and line buffering off and back on,
//! and reading one keystroke at a time. [`CrosstermConsole`] implements it
//! for the process's own terminal on both Unix and Windows.

use std::io::{self, IsTerminal};
use std::ops::{Deref, DerefMut};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::warn;

/// A single keystroke, already translated from the platform's key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// A printable (or otherwise unhandled) character.
    Char(char),
    /// `\n` or `\r`.
    Enter,
    /// DEL on Unix terminals, `^H` on Windows consoles.
    Backspace,
    /// Ctrl-C. Raw mode disables signal generation, so it arrives as a key.
    Interrupt,
    /// Ctrl-D, or the terminal reported there is no more input.
    EndOfInput,
    /// Keys with no meaning for password entry (arrows, function keys).
    Ignored,
}

/// Keystroke-level access to an interactive terminal.
pub trait RawConsole {
    /// Whether input comes from an interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Saves the current mode and disables echo and line buffering.
    fn enter_raw_mode(&mut self) -> io::Result<()>;

    /// Restores the mode saved by [`RawConsole::enter_raw_mode`].
    fn restore_mode(&mut self) -> io::Result<()>;

    /// Blocks until the next keystroke.
    fn read_keystroke(&mut self) -> io::Result<Keystroke>;
}

/// Holds a console in raw mode; the previous mode is restored on drop.
pub struct RawModeGuard<'a, C: RawConsole + ?Sized> {
    console: &'a mut C,
}

impl<'a, C: RawConsole + ?Sized> RawModeGuard<'a, C> {
    pub fn acquire(console: &'a mut C) -> io::Result<Self> {
        console.enter_raw_mode()?;
        Ok(Self { console })
    }
}

impl<C: RawConsole + ?Sized> Deref for RawModeGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &*self.console
    }
}

impl<C: RawConsole + ?Sized> DerefMut for RawModeGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut *self.console
    }
}

impl<C: RawConsole + ?Sized> Drop for RawModeGuard<'_, C> {
    fn drop(&mut self) {
        if let Err(e) = self.console.restore_mode() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// The process's controlling terminal, driven through crossterm.
///
/// Keystrokes pass through crossterm's internal input buffer and event
/// queue before they reach [`RawConsole::read_keystroke`]. Those are owned
/// by crossterm and are never zeroed, so typed bytes may linger in freed
/// memory there even though every buffer in this crate is wiped.
#[derive(Debug, Default)]
pub struct CrosstermConsole;

impl CrosstermConsole {
    pub fn new() -> Self {
        Self
    }
}

impl RawConsole for CrosstermConsole {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn read_keystroke(&mut self) -> io::Result<Keystroke> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(keystroke) = translate_key(key) {
                    return Ok(keystroke);
                }
            }
        }
    }
}

/// Maps a crossterm key event to a keystroke. Key releases, which Windows
/// consoles report separately, yield `None`.
///
/// Ctrl with a letter produces the matching control byte, as a terminal in
/// raw mode would deliver it. Alt combinations are ignored, except Ctrl+Alt,
/// which Windows reports for characters typed with AltGr.
fn translate_key(key: KeyEvent) -> Option<Keystroke> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let keystroke = match key.code {
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => Keystroke::Enter,
        KeyCode::Backspace | KeyCode::Char('\x08') | KeyCode::Char('\x7f') => Keystroke::Backspace,
        KeyCode::Char(c) if ctrl && alt => Keystroke::Char(c),
        KeyCode::Char(_) if alt => Keystroke::Ignored,
        KeyCode::Char('c') if ctrl => Keystroke::Interrupt,
        KeyCode::Char('d') if ctrl => Keystroke::EndOfInput,
        KeyCode::Char('h') if ctrl => Keystroke::Backspace,
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => {
            Keystroke::Char(char::from(c.to_ascii_lowercase() as u8 & 0x1f))
        }
        KeyCode::Char(_) if ctrl => Keystroke::Ignored,
        KeyCode::Char(c) => Keystroke::Char(c),
        KeyCode::Tab => Keystroke::Char('\t'),
        _ => Keystroke::Ignored,
    };
    Some(keystroke)
}
