//! Prompt configuration

use crate::secret::MAX_PASSWORD_SIZE;

/// Text and limits used by a [`Prompter`](crate::password_container::Prompter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    /// Bytes accepted per entry. Further input is dropped.
    pub max_length: usize,
    /// Character echoed for every byte typed on a terminal.
    pub mask: char,
    /// Appended to the caller's message, e.g. `"Password"` becomes `"Password: "`.
    pub message_suffix: String,
    /// Shown before the second entry in confirmation mode.
    pub confirm_message: String,
    /// Shown, followed by a newline, when the two entries differ.
    pub mismatch_message: String,
}

impl PromptConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    pub fn message_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.message_suffix = suffix.into();
        self
    }

    pub fn confirm_message(mut self, message: impl Into<String>) -> Self {
        self.confirm_message = message.into();
        self
    }

    pub fn mismatch_message(mut self, message: impl Into<String>) -> Self {
        self.mismatch_message = message.into();
        self
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_length: MAX_PASSWORD_SIZE,
            mask: '*',
            message_suffix: ": ".to_string(),
            confirm_message: "Confirm Password: ".to_string(),
            mismatch_message: "Passwords do not match! Please try again.".to_string(),
        }
    }
}
