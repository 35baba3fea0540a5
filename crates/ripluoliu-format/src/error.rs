//! Error types for ripluoliu-format.

use crate::FourCC;
use std::io;
use thiserror::Error;

/// Result type for ripluoliu-format operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which framing tag failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPosition {
    TocLeading,
    TocTrailing,
    BlockLeading,
    BlockTrailing,
}

impl std::fmt::Display for TagPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TocLeading => "leading TOC tag",
            Self::TocTrailing => "trailing TOC tag",
            Self::BlockLeading => "leading block tag",
            Self::BlockTrailing => "trailing block tag",
        };
        f.write_str(s)
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A framing tag did not match, or the block chain stopped advancing.
    StructuralInvalid,
    /// A region or payload extends past the end of the buffer.
    Truncated,
    /// Caller supplied a malformed value (e.g. a FourCC that is not 4 bytes).
    MalformedArgument,
    /// Reading or writing failed.
    IoFailure,
}

/// Error type for ripluoliu-format operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read would run past the end of the buffer.
    #[error("Truncated at offset {offset:#x}: need {need} bytes, have {have}")]
    Truncated { offset: usize, need: usize, have: usize },

    /// A framing tag did not match.
    #[error("Bad {position} at offset {offset:#x}: expected '{expected}', found '{found}'")]
    BadTag {
        position: TagPosition,
        offset: usize,
        expected: FourCC,
        found: FourCC,
    },

    /// The declared next block does not lie past the current one.
    #[error("Block at offset {offset:#x} does not advance (next offset {next:#x})")]
    NoProgress { offset: usize, next: usize },

    /// The caller-supplied block limit was reached.
    #[error("Block limit of {0} reached")]
    LimitReached(usize),

    /// A FourCC string was not exactly four ASCII characters.
    #[error("Invalid FourCC '{0}': expected exactly 4 ASCII characters")]
    InvalidFourCc(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::IoFailure,
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::BadTag { .. } | Self::NoProgress { .. } | Self::LimitReached(_) => {
                ErrorKind::StructuralInvalid
            }
            Self::InvalidFourCc(_) => ErrorKind::MalformedArgument,
        }
    }

    pub(crate) fn truncated(offset: usize, need: usize, have: usize) -> Self {
        Self::Truncated { offset, need, have }
    }
}
