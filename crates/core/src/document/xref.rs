//! Cross-reference location and plaintext entry table parsing.
//!
//! Handles:
//! - Reading the `startxref` value that closes each revision region
//! - Recovering the first table of linearized files (`startxref 0`)
//! - Recognizing PDF 1.5 cross-reference streams (entries left undecoded)
//! - Parsing classic fixed-width `xref` entry tables

use super::boundary::{EOF_MARKER, RevisionRegion};
use super::object::extract_object;
use super::source::PdfBytes;
use crate::error::{PdfError, Result};
use crate::parser::scan;
use indexmap::IndexMap;

const XREF: &[u8] = b"xref";
const STARTXREF: &[u8] = b"startxref";
const TRAILER: &[u8] = b"trailer";
const SIZE: &[u8] = b"/Size";

/// Length of an entry line without its two-byte terminator.
const ENTRY_LINE_LEN: usize = 18;
/// Longest line still treated as a subsection header.
const MAX_HEADER_LINE_LEN: usize = 17;

/// One row of an xref table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefEntry {
    pub obj_id: u32,
    /// Byte offset of the object body (for free entries: next free object id).
    pub offset: u64,
    pub generation: u16,
    /// `n` entries are in use, `f` entries are free.
    pub in_use: bool,
}

impl XRefEntry {
    pub const fn is_free(&self) -> bool {
        !self.in_use
    }
}

/// How a revision's cross-reference data is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XRefKind {
    /// Classic plaintext `xref` table.
    Table,
    /// PDF 1.5 cross-reference stream; recognized but not decoded.
    Stream,
}

/// Where a revision's xref lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefLocation {
    /// Offset of the `xref` keyword or of the xref stream object.
    pub start: usize,
    /// Offset of the `%%EOF` that terminates this xref.
    pub end: usize,
    pub kind: XRefKind,
    /// Found through the linearized `startxref 0` fallback.
    pub is_linear: bool,
}

/// Read the integer following the last `startxref` keyword of `region`.
pub fn read_startxref(data: &[u8], region: RevisionRegion) -> Option<u64> {
    let pos = scan::rfind_keyword(data, region.lo, region.eof, STARTXREF)?;
    scan::read_uint_after_ws(data, pos + STARTXREF.len(), region.eof).map(|(value, _)| value)
}

/// Resolve the xref that `startxref` names for one revision region.
///
/// Returns [`PdfError::InvalidXref`] when the value points at neither an
/// xref table nor an xref stream; the caller keeps the revision as a
/// placeholder and moves on.
pub fn locate_xref(source: &PdfBytes, region: RevisionRegion, startxref: u64) -> Result<XRefLocation> {
    let data = source.as_slice();

    let (start, is_linear) = if startxref == 0 {
        let trailer = scan::rfind_keyword(data, region.lo, region.eof, TRAILER)
            .ok_or_else(|| PdfError::invalid_xref(region.eof, "startxref is 0 but no trailer precedes it"))?;
        let start = scan::rfind_keyword(data, region.lo, trailer, XREF)
            .ok_or_else(|| PdfError::invalid_xref(region.eof, "startxref is 0 but no xref precedes the trailer"))?;
        (start, true)
    } else {
        let start = usize::try_from(startxref)
            .ok()
            .filter(|&s| s < data.len())
            .ok_or_else(|| {
                PdfError::invalid_xref(region.eof, format!("startxref {startxref} is beyond end of file"))
            })?;
        (start, false)
    };

    let kind = if data[start..].starts_with(XREF) {
        XRefKind::Table
    } else if is_xref_stream(source, start) {
        XRefKind::Stream
    } else {
        return Err(PdfError::invalid_xref(
            region.eof,
            format!("offset {start} holds neither an xref table nor an xref stream"),
        ));
    };

    let end = scan::find(data, start, data.len(), EOF_MARKER).ok_or_else(|| {
        PdfError::invalid_xref(region.eof, format!("no %%EOF follows the xref at {start}"))
    })?;

    tracing::debug!(start, end, ?kind, is_linear, "located xref");
    Ok(XRefLocation {
        start,
        end,
        kind,
        is_linear,
    })
}

/// Check whether `start` holds an indirect object carrying a stream.
///
/// No entry table is known for the region yet, so the lookup goes through a
/// single-entry table built from the object header itself.
fn is_xref_stream(source: &PdfBytes, start: usize) -> bool {
    let data = source.as_slice();
    let Some((obj_id, generation, _)) = scan::read_object_header(data, start, data.len()) else {
        return false;
    };
    let ad_hoc = [XRefEntry {
        obj_id,
        offset: start as u64,
        generation,
        in_use: true,
    }];
    extract_object(source, obj_id, &ad_hoc).is_some_and(|obj| obj.is_stream())
}

/// Parse the plaintext entry table at `location`.
///
/// `/Size` bounds the number of entries read, but parsing stops early at
/// `trailer`; the returned table holds what was actually parsed. Malformed
/// lines are fatal because every later lookup trusts these offsets.
pub fn parse_entries(source: &PdfBytes, location: &XRefLocation) -> Result<Vec<XRefEntry>> {
    let data = source.as_slice();
    let (start, end) = (location.start, location.end);

    let declared = read_declared_size(data, start, end)?;
    // Every entry needs a full line, so the region length caps the allocation.
    let capacity = declared.min((end - start) / ENTRY_LINE_LEN + 1);
    let mut table: IndexMap<u32, XRefEntry> = IndexMap::with_capacity(capacity);

    let mut pos = start + XREF.len();
    let mut next_id: u64 = 0;
    let mut parsed = 0;
    while parsed < declared {
        let Some((line, line_end)) = scan::read_line(data, pos, end) else {
            return Err(PdfError::corrupt(
                pos,
                "entry table runs past the end of its revision without a trailer",
            ));
        };
        let line_start = line_end - line.len();
        pos = line_end;

        let content = scan::trim_end(line);
        if scan::trim_start(content).is_empty() {
            continue;
        }
        if scan::trim_start(content).starts_with(TRAILER) {
            break;
        }

        if content.len() > MAX_HEADER_LINE_LEN {
            let (offset, generation, in_use) = parse_entry_line(content).ok_or_else(|| {
                PdfError::corrupt(
                    line_start,
                    format!("malformed xref entry {:?}", String::from_utf8_lossy(line)),
                )
            })?;
            let obj_id = u32::try_from(next_id)
                .map_err(|_| PdfError::corrupt(line_start, "object id overflows"))?;
            next_id += 1;
            parsed += 1;
            table.insert(
                obj_id,
                XRefEntry {
                    obj_id,
                    offset,
                    generation,
                    in_use,
                },
            );
        } else {
            next_id = parse_subsection_header(content).ok_or_else(|| {
                PdfError::corrupt(
                    line_start,
                    format!("malformed xref subsection header {:?}", String::from_utf8_lossy(line)),
                )
            })?;
        }
    }

    tracing::debug!(start, declared, parsed = table.len(), "parsed xref entry table");
    Ok(table.into_values().collect())
}

/// Read the `/Size` declared by the trailer closest to `end`.
fn read_declared_size(data: &[u8], start: usize, end: usize) -> Result<usize> {
    let pos = scan::rfind_name(data, start, end, SIZE)
        .ok_or_else(|| PdfError::corrupt(start, "trailer declares no /Size"))?;
    scan::read_uint_after_ws(data, pos + SIZE.len(), end)
        .and_then(|(size, _)| usize::try_from(size).ok())
        .ok_or_else(|| PdfError::corrupt(pos, "unreadable /Size value"))
}

/// Parse `oooooooooo ggggg n` into (offset, generation, in use).
fn parse_entry_line(line: &[u8]) -> Option<(u64, u16, bool)> {
    if line.len() != ENTRY_LINE_LEN || line[10] != b' ' || line[16] != b' ' {
        return None;
    }
    let (offset, offset_end) = scan::read_uint(line, 0, 10)?;
    let (generation, generation_end) = scan::read_uint(line, 11, 16)?;
    if offset_end != 10 || generation_end != 16 {
        return None;
    }
    let in_use = match line[17] {
        b'n' => true,
        b'f' => false,
        _ => return None,
    };
    Some((offset, u16::try_from(generation).ok()?, in_use))
}

/// Parse `<first id> <count>`, returning the first id.
fn parse_subsection_header(line: &[u8]) -> Option<u64> {
    let (first, pos) = scan::read_uint_after_ws(line, 0, line.len())?;
    let (_count, pos) = scan::read_uint_after_ws(line, pos, line.len())?;
    (scan::skip_whitespace(line, pos, line.len()) == line.len()).then_some(first)
}
