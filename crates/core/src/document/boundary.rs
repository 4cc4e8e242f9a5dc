//! Revision boundary scanning.
//!
//! Every incrementally saved revision ends with its own `%%EOF` marker, so
//! the markers split the file into coarse per-revision regions.

use crate::parser::scan;

pub const EOF_MARKER: &[u8] = b"%%EOF";

/// Lazy iterator over `%%EOF` marker offsets in file order.
///
/// The scan holds only a position into an immutable buffer, so a clone
/// replays the remaining markers and [`eof_markers`] restarts from offset 0.
#[derive(Debug, Clone)]
pub struct EofMarkers<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Iterator for EofMarkers<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let found = scan::find(self.data, self.pos, self.data.len(), EOF_MARKER)?;
        self.pos = found + EOF_MARKER.len();
        Some(found)
    }
}

/// Scan `data` from the start for revision boundaries.
pub fn eof_markers(data: &[u8]) -> EofMarkers<'_> {
    EofMarkers { data, pos: 0 }
}

/// A boundary together with the region it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRegion {
    /// First byte after the previous `%%EOF` (0 for the first revision).
    pub lo: usize,
    /// Offset of this revision's `%%EOF`.
    pub eof: usize,
}

/// Pair each boundary with the end of the previous one.
pub fn regions(data: &[u8]) -> impl Iterator<Item = RevisionRegion> + '_ {
    let mut lo = 0;
    eof_markers(data).map(move |eof| {
        let region = RevisionRegion { lo, eof };
        lo = eof + EOF_MARKER.len();
        region
    })
}
