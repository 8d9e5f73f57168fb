//! Password prompting with optional confirmation
//!
//! A [`Prompter`] decides once per call whether its input is an interactive
//! terminal. On a terminal the password is typed with echo off and a mask
//! shown instead; otherwise one line is read from the input stream. In
//! confirmation mode a terminal user types the password twice, and is asked
//! again until both entries match. Piped input only ever supplies the one
//! line, so confirmation is skipped there.

use std::io::{self, Read, Stderr, Stdin, Write};

use tracing::debug;

use crate::config::PromptConfig;
use crate::console::{CrosstermConsole, RawConsole};
use crate::error::{PromptError, Result};
use crate::line_editor::{LineEditor, SuspendGuard};
use crate::secret::SecretBuffer;
use crate::stream::StreamReader;
use crate::terminal::TerminalReader;

/// Anything that can be asked for a password.
pub trait PasswordSource {
    /// Returns `None` when no password could be obtained (input closed,
    /// entry interrupted, I/O failure). An empty password is `Some`.
    fn prompt(&mut self, verify: bool, message: Option<&str>) -> Option<SecretBuffer>;
}

/// Reads passwords from a console or stream and writes prompts to a display.
pub struct Prompter<C, R, W> {
    console: C,
    input: R,
    display: W,
    config: PromptConfig,
    line_editor: Option<Box<dyn LineEditor>>,
}

impl Prompter<CrosstermConsole, Stdin, Stderr> {
    /// Prompter for the process's terminal: reads stdin, writes prompts to stderr.
    pub fn stdio(config: PromptConfig) -> Self {
        Self::new(CrosstermConsole::new(), io::stdin(), io::stderr(), config)
    }
}

impl<C, R, W> Prompter<C, R, W>
where
    C: RawConsole,
    R: Read,
    W: Write,
{
    pub fn new(console: C, input: R, display: W, config: PromptConfig) -> Self {
        Self {
            console,
            input,
            display,
            config,
            line_editor: None,
        }
    }

    /// Suspends `editor` for the duration of every prompt.
    pub fn with_line_editor(mut self, editor: Box<dyn LineEditor>) -> Self {
        self.line_editor = Some(editor);
        self
    }

    /// Reads a password, asking for it twice on a terminal when `verify` is set.
    ///
    /// `message`, if any, is shown followed by the configured suffix before
    /// each first entry. Mismatched confirmations are retried without limit;
    /// only a failed read ends the loop early.
    pub fn try_prompt(&mut self, verify: bool, message: Option<&str>) -> Result<SecretBuffer> {
        let editor: Option<&mut dyn LineEditor> = match &mut self.line_editor {
            Some(editor) => Some(&mut **editor),
            None => None,
        };
        let _suspended = SuspendGuard::new(editor);
        let interactive = self.console.is_interactive();
        debug!(interactive, verify, "prompting for password");

        let terminal = TerminalReader::new(self.config.mask);
        loop {
            if let Some(message) = message {
                write!(self.display, "{}{}", message, self.config.message_suffix)
                    .and_then(|()| self.display.flush())
                    .map_err(PromptError::display)?;
            }

            let mut first = SecretBuffer::with_max_len(self.config.max_length);
            if interactive {
                terminal.read(&mut self.console, &mut self.display, &mut first)?;
            } else {
                StreamReader::new().read(&mut self.input, &mut first)?;
            }

            if !verify || !interactive {
                return Ok(first);
            }

            self.display
                .write_all(self.config.confirm_message.as_bytes())
                .and_then(|()| self.display.flush())
                .map_err(PromptError::display)?;
            let mut second = SecretBuffer::with_max_len(self.config.max_length);
            terminal.read(&mut self.console, &mut self.display, &mut second)?;

            if first == second {
                return Ok(first);
            }

            debug!("password confirmation did not match, prompting again");
            drop(first);
            drop(second);
            writeln!(self.display, "{}", self.config.mismatch_message)
                .map_err(PromptError::display)?;
        }
    }
}

impl<C, R, W> PasswordSource for Prompter<C, R, W>
where
    C: RawConsole,
    R: Read,
    W: Write,
{
    fn prompt(&mut self, verify: bool, message: Option<&str>) -> Option<SecretBuffer> {
        match self.try_prompt(verify, message) {
            Ok(secret) => Some(secret),
            Err(e) => {
                debug!(error = %e, "no password obtained");
                None
            }
        }
    }
}

/// Prompts on the process's terminal (or reads a line from stdin when it is
/// not a terminal) with the default configuration.
pub fn prompt(verify: bool, message: Option<&str>) -> Option<SecretBuffer> {
    Prompter::stdio(PromptConfig::default()).prompt(verify, message)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::console::testing::ScriptedConsole;
    use crate::error::ErrorKind;
    use crate::line_editor::testing::RecordingEditor;

    fn interactive(text: &str) -> Prompter<ScriptedConsole, Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            ScriptedConsole::typing(text),
            Cursor::new(Vec::new()),
            Vec::new(),
            PromptConfig::default(),
        )
    }

    fn piped(data: &[u8]) -> Prompter<ScriptedConsole, Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            ScriptedConsole::non_interactive(),
            Cursor::new(data.to_vec()),
            Vec::new(),
            PromptConfig::default(),
        )
    }

    fn shown(prompter: &Prompter<ScriptedConsole, Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.display.clone()).unwrap()
    }

    #[test]
    fn test_single_entry() {
        let mut prompter = interactive("abc\n");
        let secret = prompter.prompt(false, Some("Password")).unwrap();
        assert_eq!(secret.expose(), b"abc");
        assert_eq!(shown(&prompter), "Password: ***\r\n");
        assert_eq!(prompter.console.raw_sessions, 1);
    }

    #[test]
    fn test_no_message() {
        let mut prompter = interactive("abc\n");
        prompter.prompt(false, None).unwrap();
        assert_eq!(shown(&prompter), "***\r\n");
    }

    #[test]
    fn test_empty_password_is_a_value() {
        let mut prompter = interactive("\n");
        let secret = prompter.prompt(false, None).unwrap();
        assert!(secret.is_empty());
    }

    #[test]
    fn test_verify_matching() {
        let mut prompter = interactive("abc\nabc\n");
        let secret = prompter.prompt(true, Some("Password")).unwrap();
        assert_eq!(secret.expose(), b"abc");
        assert_eq!(prompter.console.raw_sessions, 2);
        assert_eq!(shown(&prompter), "Password: ***\r\nConfirm Password: ***\r\n");
    }

    #[test]
    fn test_verify_mismatch_prompts_again() {
        let mut prompter = interactive("abc\nxyz\nabc\nabc\n");
        let secret = prompter.prompt(true, Some("Password")).unwrap();
        assert_eq!(secret.expose(), b"abc");
        // Two entries per round, two rounds.
        assert_eq!(prompter.console.raw_sessions, 4);
        let shown = shown(&prompter);
        assert_eq!(shown.matches("Password: ").count(), 4);
        assert_eq!(shown.matches("Passwords do not match! Please try again.\n").count(), 1);
    }

    #[test]
    fn test_verify_retries_until_match() {
        let mut prompter = interactive("a\nb\nc\nd\ne\ne\n");
        let secret = prompter.prompt(true, None).unwrap();
        assert_eq!(secret.expose(), b"e");
        assert_eq!(prompter.console.raw_sessions, 6);
        assert_eq!(prompter.console.remaining(), 0);
    }

    #[test]
    fn test_first_entry_failure() {
        let mut prompter = interactive("abc");
        assert!(prompter.prompt(true, Some("Password")).is_none());
        assert!(!prompter.console.raw);
    }

    #[test]
    fn test_confirmation_failure() {
        let mut prompter = interactive("abc\nab\x03");
        let err = prompter.try_prompt(true, None).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Interrupted));
        assert!(!prompter.console.raw);
    }

    #[test]
    fn test_piped_single_line() {
        let mut prompter = piped(b"hunter2\nignored");
        let secret = prompter.prompt(false, Some("Password")).unwrap();
        assert_eq!(secret.expose(), b"hunter2");
        assert_eq!(prompter.console.raw_sessions, 0);
        assert_eq!(shown(&prompter), "Password: ");

        let mut rest = String::new();
        prompter.input.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "ignored");
    }

    #[test]
    fn test_piped_verify_reads_one_line() {
        let mut prompter = piped(b"first\nsecond\n");
        let secret = prompter.prompt(true, None).unwrap();
        assert_eq!(secret.expose(), b"first");
        assert_eq!(prompter.input.position(), 6);
        assert!(!shown(&prompter).contains("Confirm"));
    }

    #[test]
    fn test_piped_empty_input() {
        let mut prompter = piped(b"");
        let secret = prompter.prompt(false, None).unwrap();
        assert!(secret.is_empty());
    }

    #[test]
    fn test_interactivity_checked_per_call() {
        let mut prompter = interactive("abc\n");
        prompter.prompt(false, None).unwrap();
        prompter.console.interactive = false;
        prompter.input = Cursor::new(b"piped\n".to_vec());
        let secret = prompter.prompt(false, None).unwrap();
        assert_eq!(secret.expose(), b"piped");
        assert_eq!(prompter.console.raw_sessions, 1);
    }

    #[test]
    fn test_configured_limit_and_text() {
        let config = PromptConfig::new()
            .max_length(2)
            .mask('#')
            .message_suffix("> ")
            .confirm_message("again> ");
        let mut prompter = Prompter::new(
            ScriptedConsole::typing("abc\nab\n"),
            Cursor::new(Vec::new()),
            Vec::<u8>::new(),
            config,
        );
        let secret = prompter.prompt(true, Some("pw")).unwrap();
        assert_eq!(secret.expose(), b"ab");
        assert_eq!(
            String::from_utf8(prompter.display.clone()).unwrap(),
            "pw> ##\r\nagain> ##\r\n"
        );
    }

    #[test]
    fn test_unbounded_limit() {
        let mut prompter = Prompter::new(
            ScriptedConsole::non_interactive(),
            Cursor::new(b"pw\n".to_vec()),
            Vec::<u8>::new(),
            PromptConfig::new().max_length(usize::MAX),
        );
        let secret = prompter.prompt(false, None).unwrap();
        assert_eq!(secret.expose(), b"pw");
        assert_eq!(secret.max_len(), usize::MAX);
    }

    #[test]
    fn test_line_editor_suspended_around_prompt() {
        let editor = RecordingEditor::default();
        let calls = editor.calls.clone();
        let mut prompter = interactive("abc\n").with_line_editor(Box::new(editor));
        prompter.prompt(false, None).unwrap();
        assert_eq!(*calls.borrow(), vec!["suspend", "resume"]);
    }

    #[test]
    fn test_line_editor_resumed_on_failure() {
        let editor = RecordingEditor::default();
        let calls = editor.calls.clone();
        let mut prompter = interactive("").with_line_editor(Box::new(editor));
        assert!(prompter.prompt(false, None).is_none());
        assert_eq!(*calls.borrow(), vec!["suspend", "resume"]);
    }
}
