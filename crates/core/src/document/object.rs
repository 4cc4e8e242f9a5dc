//! Raw object extraction.
//!
//! Objects are sliced out of the byte source as raw text spans; nothing here
//! tokenizes PDF syntax beyond the keywords that delimit an object.

use super::source::PdfBytes;
use super::xref::XRefEntry;
use crate::parser::scan;
use bytes::Bytes;

const ENDOBJ: &[u8] = b"endobj";
const STREAM: &[u8] = b"stream";
const ENDSTREAM: &[u8] = b"endstream";

/// The raw bytes of one indirect object.
///
/// The span starts at the object's xref offset and always ends with its
/// terminating keyword (`endobj`, or `endstream` for stream objects), so
/// callers may truncate or overwrite it safely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    offset: usize,
    data: Bytes,
    is_stream: bool,
}

impl RawObject {
    /// Byte offset of the object in the source.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub const fn is_stream(&self) -> bool {
        self.is_stream
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Value of the object's `/Type` key, if it declares one.
    pub fn type_name(&self) -> Option<&[u8]> {
        type_value(&self.data)
    }
}

/// Find the in-use entry for `obj_id`.
pub fn find_entry(entries: &[XRefEntry], obj_id: u32) -> Option<&XRefEntry> {
    entries.iter().find(|e| e.obj_id == obj_id && e.in_use)
}

/// Extract object `obj_id` using the offsets in `entries`.
///
/// Returns `None` when no in-use entry has that id or the object is not
/// terminated; speculative lookups are expected to miss.
pub fn extract_object(source: &PdfBytes, obj_id: u32, entries: &[XRefEntry]) -> Option<RawObject> {
    let entry = find_entry(entries, obj_id)?;
    let offset = usize::try_from(entry.offset).ok()?;
    extract_at(source, offset)
}

/// Extract the object starting at `offset`.
pub fn extract_at(source: &PdfBytes, offset: usize) -> Option<RawObject> {
    let data = source.as_slice();
    if offset >= data.len() {
        return None;
    }

    let endobj = scan::find_keyword(data, offset, data.len(), ENDOBJ);
    let stream_hi = endobj.unwrap_or(data.len());

    let (end, is_stream) = match scan::find_keyword(data, offset, stream_hi, STREAM) {
        Some(stream_pos) => {
            // Stream payloads may butt against the keyword, so no boundary check.
            let endstream = scan::find(data, stream_pos + STREAM.len(), data.len(), ENDSTREAM)?;
            (endstream + ENDSTREAM.len(), true)
        }
        None => (endobj? + ENDOBJ.len(), false),
    };

    Some(RawObject {
        offset,
        data: source.slice(offset, end),
        is_stream,
    })
}

/// Value of the first `/Type` key in `data`.
///
/// Skips keys such as `/Type1` and reads the name up to the next whitespace,
/// `/` or `>`.
pub fn type_value(data: &[u8]) -> Option<&[u8]> {
    let key = scan::find_name(data, 0, data.len(), b"/Type")?;
    let mut pos = key + b"/Type".len();
    while pos < data.len() && (scan::is_whitespace(data[pos]) || data[pos] == b'/') {
        pos += 1;
    }
    let start = pos;
    while pos < data.len() && !(scan::is_whitespace(data[pos]) || data[pos] == b'/' || data[pos] == b'>')
    {
        pos += 1;
    }
    (pos > start).then(|| &data[start..pos])
}

/// Human-readable object type used by the summary report.
///
/// `"Stream"` for stream objects, the `/Type` value when present, and
/// `"Unknown"` otherwise (including objects that cannot be found).
pub fn object_type(object: Option<&RawObject>) -> String {
    match object {
        Some(obj) if obj.is_stream() => "Stream".to_string(),
        Some(obj) => obj
            .type_name()
            .map_or_else(|| "Unknown".to_string(), |t| String::from_utf8_lossy(t).into_owned()),
        None => "Unknown".to_string(),
    }
}
