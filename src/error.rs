use std::error::Error as StdError;
use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Use of Internal is never a guarantee the error was not caused by the
    /// user (a closed terminal, for example), merely that the code cannot
    /// tell.
    Internal,

    /// The user ended or interrupted entry.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The underlying terminal or stream could not deliver a line: an I/O
    /// error, end of input before a terminator, or a terminal API failure.
    AcquisitionFailed,
    /// Entry was interrupted with Ctrl-C while the terminal was in raw mode.
    Interrupted,
    /// The secret was requested as text but is not valid UTF-8.
    InvalidUtf8,
    /// Writing the prompt or masking feedback to the display failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct PromptError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag. Any code consuming errors MUST
    /// handle the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl PromptError {
    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Read failure on the terminal or stream.
    pub(crate) fn acquisition(msg: impl Into<String>, source: io::Error) -> Self {
        Self::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::AcquisitionFailed,
            msg,
            source,
        )
    }

    /// Write failure on the display sink.
    pub(crate) fn display(source: io::Error) -> Self {
        let msg = format!("failed to write to display: {}", source);
        Self::with_kind_and_source(ErrorCategory::Internal, ErrorKind::Io, msg, source)
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Puts `msg` in front of this error, which is kept as the source. The
    /// category and kind carry over so callers can still branch on them.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PromptError>;
