//! Document information dictionary extraction.
//!
//! Each revision's trailer may name an `/Info` object. Its legacy key/value
//! form is read with bounded byte scans; XML metadata streams (PDF 1.4+) are
//! recognized and left empty.

use super::revision::{PDFRevision, adjacent_linear, resolve_object};
use super::source::PdfBytes;
use crate::codec::text::decode_text_string;
use crate::parser::scan;

/// Default bound on the raw bytes copied for one value.
pub const DEFAULT_MAX_VALUE_LEN: usize = 128;

/// Keys read from the info dictionary, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Producer,
    CreationDate,
    ModDate,
    Trapped,
}

impl InfoKey {
    pub const ALL: [Self; 9] = [
        Self::Title,
        Self::Author,
        Self::Subject,
        Self::Keywords,
        Self::Creator,
        Self::Producer,
        Self::CreationDate,
        Self::ModDate,
        Self::Trapped,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Subject => "Subject",
            Self::Keywords => "Keywords",
            Self::Creator => "Creator",
            Self::Producer => "Producer",
            Self::CreationDate => "CreationDate",
            Self::ModDate => "ModDate",
            Self::Trapped => "Trapped",
        }
    }

    const fn name_token(self) -> &'static [u8] {
        match self {
            Self::Title => b"/Title",
            Self::Author => b"/Author",
            Self::Subject => b"/Subject",
            Self::Keywords => b"/Keywords",
            Self::Creator => b"/Creator",
            Self::Producer => b"/Producer",
            Self::CreationDate => b"/CreationDate",
            Self::ModDate => b"/ModDate",
            Self::Trapped => b"/Trapped",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for InfoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded info values for one revision; absent keys are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    values: [String; 9],
}

impl DocumentInfo {
    pub fn get(&self, key: InfoKey) -> &str {
        &self.values[key.index()]
    }

    pub(crate) fn set(&mut self, key: InfoKey, value: String) {
        self.values[key.index()] = value;
    }

    /// All keys in display order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (InfoKey, &str)> + '_ {
        InfoKey::ALL.iter().map(|&k| (k, self.get(k)))
    }

    /// Keys with a non-empty value.
    pub fn present(&self) -> impl Iterator<Item = (InfoKey, &str)> + '_ {
        self.iter().filter(|(_, v)| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }
}

/// What a revision's `/Info` lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InfoOutcome {
    Legacy(DocumentInfo),
    XmlMetadata,
    Missing,
}

/// Extract the info dictionary declared by revision `index`'s trailer.
pub(crate) fn extract_info(
    source: &PdfBytes,
    revisions: &[PDFRevision],
    index: usize,
    max_value_len: usize,
) -> InfoOutcome {
    let Some(revision) = revisions.get(index) else {
        return InfoOutcome::Missing;
    };
    if !revision.is_valid() || revision.is_stream {
        return InfoOutcome::Missing;
    }
    let data = source.as_slice();

    let info_id = trailer_reference(data, revision, b"/Info").or_else(|| {
        adjacent_linear(revisions, index).find_map(|r| trailer_reference(data, r, b"/Info"))
    });
    let Some(info_id) = info_id else {
        return InfoOutcome::Missing;
    };

    let Some(object) = resolve_object(source, revisions, index, info_id) else {
        tracing::warn!(
            version = revision.version,
            info_id,
            "info object named by trailer not found"
        );
        return InfoOutcome::Missing;
    };

    if object.type_name().is_some_and(|t| t.starts_with(b"M")) {
        tracing::debug!(version = revision.version, info_id, "info is an XML metadata stream");
        return InfoOutcome::XmlMetadata;
    }

    let body = object.bytes();
    let mut info = DocumentInfo::default();
    for key in InfoKey::ALL {
        let raw = match read_value(body, key) {
            Some(RawValue::Direct(raw)) => Some(raw.to_vec()),
            Some(RawValue::Reference(id)) => resolve_object(source, revisions, index, id)
                .and_then(|obj| first_string(obj.bytes()).map(<[u8]>::to_vec)),
            None => None,
        };
        if let Some(mut raw) = raw {
            raw.truncate(max_value_len);
            info.set(key, decode_text_string(&raw));
        }
    }
    InfoOutcome::Legacy(info)
}

/// Read the indirect reference stored under `key` in a revision's trailer.
pub(crate) fn trailer_reference(data: &[u8], revision: &PDFRevision, key: &[u8]) -> Option<u32> {
    let trailer = scan::find_keyword(data, revision.start, revision.end, b"trailer")?;
    let pos = scan::find_name(data, trailer, revision.end, key)?;
    scan::read_reference(data, pos + key.len(), revision.end)
}

enum RawValue<'a> {
    Direct(&'a [u8]),
    Reference(u32),
}

fn read_value(body: &[u8], key: InfoKey) -> Option<RawValue<'_>> {
    let token = key.name_token();
    let pos = scan::find_name(body, 0, body.len(), token)?;
    let start = scan::skip_whitespace(body, pos + token.len(), body.len());
    match *body.get(start)? {
        b'(' => Some(RawValue::Direct(literal_span(body, start))),
        b'<' if body.get(start + 1) != Some(&b'<') => Some(RawValue::Direct(hex_span(body, start))),
        b'/' => {
            let mut end = start + 1;
            while end < body.len() && scan::is_regular(body[end]) {
                end += 1;
            }
            Some(RawValue::Direct(&body[start + 1..end]))
        }
        b'0'..=b'9' => scan::read_reference(body, start, body.len()).map(RawValue::Reference),
        _ => None,
    }
}

/// The first literal or hex string in an object body.
fn first_string(body: &[u8]) -> Option<&[u8]> {
    let mut pos = scan::read_object_header(body, 0, body.len()).map_or(0, |(_, _, end)| end);
    while pos < body.len() {
        match body[pos] {
            b'(' => return Some(literal_span(body, pos)),
            b'<' if body.get(pos + 1) == Some(&b'<') => pos += 2,
            b'<' => return Some(hex_span(body, pos)),
            _ => pos += 1,
        }
    }
    None
}

/// `( ... )` including both parentheses, honoring nesting and escapes.
/// Unterminated literals run to the end of `body`.
fn literal_span(body: &[u8], start: usize) -> &[u8] {
    let mut depth = 0usize;
    let mut pos = start;
    while pos < body.len() {
        match body[pos] {
            b'\\' => pos += 1,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return &body[start..=pos];
                }
            }
            _ => {}
        }
        pos += 1;
    }
    &body[start..]
}

/// `< ... >` including both angle brackets.
fn hex_span(body: &[u8], start: usize) -> &[u8] {
    match body[start..].iter().position(|&b| b == b'>') {
        Some(close) => &body[start..=start + close],
        None => &body[start..],
    }
}
