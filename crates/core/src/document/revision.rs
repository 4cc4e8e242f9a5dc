//! Revisions and object change classification.

use super::info::DocumentInfo;
use super::object::{RawObject, extract_object};
use super::source::PdfBytes;
use super::xref::{XRefEntry, XRefKind, XRefLocation};

/// One incrementally saved revision: an xref plus its trailer region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PDFRevision {
    /// Offset of the `xref` keyword or xref stream object.
    pub start: usize,
    /// Offset of the terminating `%%EOF`.
    pub end: usize,
    /// Logical version, 1-based; 0 marks a skipped revision.
    pub version: u32,
    /// Cross-reference data is an (undecoded) xref stream.
    pub is_stream: bool,
    /// Linearized first-page table.
    pub is_linear: bool,
    /// First-page table folded into version 1 and kept for lookups.
    pub is_linear_half: bool,
    pub entries: Vec<XRefEntry>,
    pub info: Option<DocumentInfo>,
}

impl PDFRevision {
    pub(crate) fn from_location(location: &XRefLocation, version: u32) -> Self {
        Self {
            start: location.start,
            end: location.end,
            version,
            is_stream: location.kind == XRefKind::Stream,
            is_linear: location.is_linear,
            ..Self::default()
        }
    }

    /// Placeholder kept for a revision whose xref failed validation.
    pub(crate) fn placeholder(eof: usize, is_linear: bool) -> Self {
        Self {
            end: eof,
            is_linear,
            ..Self::default()
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.version != 0
    }

    pub fn entry(&self, obj_id: u32) -> Option<&XRefEntry> {
        self.entries.iter().find(|e| e.obj_id == obj_id)
    }
}

/// Fetch `obj_id` from the table of revision `index` alone.
///
/// A version 1 table that absorbed a linearized header also consults the
/// demoted header table next to it, since both describe the same version.
pub(crate) fn lookup_object(
    source: &PdfBytes,
    revisions: &[PDFRevision],
    index: usize,
    obj_id: u32,
) -> Option<RawObject> {
    let revision = revisions.get(index)?;
    extract_object(source, obj_id, &revision.entries).or_else(|| {
        adjacent_linear(revisions, index)
            .find_map(|linear| extract_object(source, obj_id, &linear.entries))
    })
}

/// Fetch `obj_id` as seen from revision `index`.
///
/// Falls back from [`lookup_object`] to earlier valid revisions, most recent
/// first, since an incremental save only lists the objects it touched.
pub(crate) fn resolve_object(
    source: &PdfBytes,
    revisions: &[PDFRevision],
    index: usize,
    obj_id: u32,
) -> Option<RawObject> {
    if let Some(obj) = lookup_object(source, revisions, index, obj_id) {
        return Some(obj);
    }
    let revision = revisions.get(index)?;

    let mut earlier: Vec<&PDFRevision> = revisions
        .iter()
        .filter(|r| r.is_valid() && r.version < revision.version)
        .collect();
    earlier.sort_by_key(|r| std::cmp::Reverse(r.version));
    earlier
        .into_iter()
        .find_map(|r| extract_object(source, obj_id, &r.entries))
}

/// Linearized header tables demoted next to revision `index`.
///
/// Placeholders left by an unusable `startxref 0` are not header tables and
/// never match.
pub(crate) fn adjacent_linear(
    revisions: &[PDFRevision],
    index: usize,
) -> impl Iterator<Item = &PDFRevision> {
    [index.checked_sub(1), index.checked_add(1)]
        .into_iter()
        .flatten()
        .filter_map(move |i| revisions.get(i))
        .filter(|r| r.is_linear_half)
}

/// Index of the valid revision with the highest version below that of
/// revision `index`.
pub fn previous_revision(revisions: &[PDFRevision], index: usize) -> Option<usize> {
    let version = revisions.get(index)?.version;
    revisions
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_valid() && r.version < version)
        .max_by_key(|(_, r)| r.version)
        .map(|(i, _)| i)
}

/// How an object entry changed relative to the previous version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionDiffStatus {
    Added,
    Modified,
    Deleted,
    /// Same offset as before; most likely unchanged.
    Unknown,
}

impl RevisionDiffStatus {
    /// Single-character tag used in summary lines.
    pub const fn as_char(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Unknown => '?',
        }
    }
}

impl std::fmt::Display for RevisionDiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Classify entry `entry_index` of revision `revision_index`.
///
/// Only the revision holding the highest version below the current one is
/// consulted, even when the id is absent there.
pub fn classify(
    revisions: &[PDFRevision],
    revision_index: usize,
    entry_index: usize,
) -> Option<RevisionDiffStatus> {
    let revision = revisions.get(revision_index)?;
    let current = revision.entries.get(entry_index)?;

    if !revision.is_valid() {
        return Some(RevisionDiffStatus::Unknown);
    }
    if revision.version == 1 {
        return Some(RevisionDiffStatus::Added);
    }
    if current.is_free() {
        return Some(RevisionDiffStatus::Deleted);
    }

    let previous = previous_revision(revisions, revision_index)
        .and_then(|i| revisions[i].entry(current.obj_id));

    let status = match previous {
        None => RevisionDiffStatus::Added,
        Some(prev) if prev.is_free() => RevisionDiffStatus::Added,
        Some(prev) if prev.offset != current.offset => RevisionDiffStatus::Modified,
        Some(_) => RevisionDiffStatus::Unknown,
    };
    Some(status)
}
