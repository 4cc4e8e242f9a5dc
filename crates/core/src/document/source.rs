//! Byte source backing a parsed document.

use bytes::Bytes;
use memmap2::Mmap;

/// Immutable view over the PDF file.
///
/// Components receive absolute offsets and slice directly, so there is no
/// shared read position to save and restore between lookups.
#[derive(Clone)]
pub enum PdfBytes {
    Owned(Bytes),
    Shared(Bytes),
}

impl PdfBytes {
    pub fn from_slice(data: &[u8]) -> Self {
        Self::Owned(Bytes::copy_from_slice(data))
    }

    pub fn from_mmap(mmap: Mmap) -> Self {
        Self::Shared(Bytes::from_owner(mmap))
    }

    pub const fn as_bytes(&self) -> &Bytes {
        match self {
            Self::Owned(data) => data,
            Self::Shared(data) => data,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.as_bytes().as_ref()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-copy sub-slice `[start, end)`, clamped to the source.
    pub fn slice(&self, start: usize, end: usize) -> Bytes {
        let end = end.min(self.len());
        let start = start.min(end);
        self.as_bytes().slice(start..end)
    }
}

impl std::fmt::Debug for PdfBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owned(data) => write!(f, "PdfBytes::Owned({} bytes)", data.len()),
            Self::Shared(data) => write!(f, "PdfBytes::Shared({} bytes)", data.len()),
        }
    }
}
