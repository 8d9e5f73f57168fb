//! Hook for an interactive line editor that shares the terminal
//!
//! A line editor with history or completion reads raw keystrokes itself and
//! would swallow or echo password input. Prompting suspends it first and
//! resumes it once the prompt is over.

/// A line editor that can step aside while a password is read.
pub trait LineEditor {
    fn suspend(&mut self);
    fn resume(&mut self);
}

/// Keeps a line editor suspended until dropped. Without an editor it does
/// nothing.
pub struct SuspendGuard<'a> {
    editor: Option<&'a mut dyn LineEditor>,
}

impl<'a> SuspendGuard<'a> {
    pub fn new(editor: Option<&'a mut dyn LineEditor>) -> Self {
        let editor = editor.map(|editor| {
            editor.suspend();
            editor
        });
        Self { editor }
    }
}

impl Drop for SuspendGuard<'_> {
    fn drop(&mut self) {
        if let Some(editor) = self.editor.as_deref_mut() {
            editor.resume();
        }
    }
}
