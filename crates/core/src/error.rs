//! Error types for exhume PDF history recovery.

use thiserror::Error;

/// Primary error type for PDF history parsing.
///
/// Only [`PdfError::NotAPdf`], [`PdfError::NoRevisionsFound`] and
/// [`PdfError::CorruptEntryTable`] abort a document. [`PdfError::InvalidXref`]
/// is confined to one revision, which is kept as a placeholder.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("not a PDF: no %PDF- header within the first {0} bytes")]
    NotAPdf(usize),

    #[error("no revisions found: document contains no %%EOF marker")]
    NoRevisionsFound,

    #[error("invalid xref for revision ending at offset {eof}: {reason}")]
    InvalidXref { eof: usize, reason: String },

    #[error("corrupt xref entry table at offset {pos}: {msg}")]
    CorruptEntryTable { pos: usize, msg: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    pub(crate) fn invalid_xref(eof: usize, reason: impl Into<String>) -> Self {
        Self::InvalidXref {
            eof,
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupt(pos: usize, msg: impl Into<String>) -> Self {
        Self::CorruptEntryTable {
            pos,
            msg: msg.into(),
        }
    }

    /// Whether this error only invalidates a single revision.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidXref { .. })
    }
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
