//! Bounded byte scanning primitives.
//!
//! Every search takes an explicit `[lo, hi)` window and reports an absolute
//! offset into the full buffer. Windows are clamped to the buffer, so callers
//! never index past either end on truncated files.

use memchr::memmem;

/// PDF whitespace characters.
#[inline]
pub const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x00' | b'\x0c')
}

/// PDF delimiter characters.
#[inline]
pub const fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Bytes that may appear inside a keyword or name token.
#[inline]
pub const fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

#[inline]
const fn is_eol(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

fn window(data: &[u8], lo: usize, hi: usize) -> Option<(usize, usize)> {
    let hi = hi.min(data.len());
    (lo < hi).then_some((lo, hi))
}

/// First occurrence of `needle` starting inside `[lo, hi)` and ending by `hi`.
pub fn find(data: &[u8], lo: usize, hi: usize, needle: &[u8]) -> Option<usize> {
    let (lo, hi) = window(data, lo, hi)?;
    memmem::find(&data[lo..hi], needle).map(|i| lo + i)
}

/// Last occurrence of `needle` inside `[lo, hi)`.
pub fn rfind(data: &[u8], lo: usize, hi: usize, needle: &[u8]) -> Option<usize> {
    let (lo, hi) = window(data, lo, hi)?;
    memmem::rfind(&data[lo..hi], needle).map(|i| lo + i)
}

fn is_keyword_at(data: &[u8], pos: usize, keyword: &[u8]) -> bool {
    let before_ok = pos == 0 || !is_regular(data[pos - 1]);
    let end = pos + keyword.len();
    let after_ok = end >= data.len() || !is_regular(data[end]);
    before_ok && after_ok
}

/// First occurrence of `keyword` as a standalone token (so `xref` does not
/// match inside `startxref`, nor `stream` inside `endstream`).
pub fn find_keyword(data: &[u8], lo: usize, hi: usize, keyword: &[u8]) -> Option<usize> {
    let mut from = lo;
    while let Some(pos) = find(data, from, hi, keyword) {
        if is_keyword_at(data, pos, keyword) {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

/// Last occurrence of `keyword` as a standalone token inside `[lo, hi)`.
pub fn rfind_keyword(data: &[u8], lo: usize, hi: usize, keyword: &[u8]) -> Option<usize> {
    let mut to = hi;
    while let Some(pos) = rfind(data, lo, to, keyword) {
        if is_keyword_at(data, pos, keyword) {
            return Some(pos);
        }
        // Shrink so the next search can no longer contain this match.
        to = pos + keyword.len() - 1;
    }
    None
}

/// First occurrence of the name token `name` (including its leading `/`)
/// that is not the prefix of a longer name.
pub fn find_name(data: &[u8], lo: usize, hi: usize, name: &[u8]) -> Option<usize> {
    let mut from = lo;
    while let Some(pos) = find(data, from, hi, name) {
        let end = pos + name.len();
        if end >= data.len() || !is_regular(data[end]) {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

/// Last occurrence of the name token `name` inside `[lo, hi)` that is not
/// the prefix of a longer name.
pub fn rfind_name(data: &[u8], lo: usize, hi: usize, name: &[u8]) -> Option<usize> {
    let mut to = hi;
    while let Some(pos) = rfind(data, lo, to, name) {
        let end = pos + name.len();
        if end >= data.len() || !is_regular(data[end]) {
            return Some(pos);
        }
        to = end - 1;
    }
    None
}

/// Skip whitespace starting at `pos`, never moving past `hi`.
pub fn skip_whitespace(data: &[u8], mut pos: usize, hi: usize) -> usize {
    let hi = hi.min(data.len());
    while pos < hi && is_whitespace(data[pos]) {
        pos += 1;
    }
    pos
}

/// Read an unsigned decimal integer at `pos`, returning (value, end position).
pub fn read_uint(data: &[u8], pos: usize, hi: usize) -> Option<(u64, usize)> {
    let hi = hi.min(data.len());
    let mut end = pos;
    let mut value: u64 = 0;
    while end < hi && data[end].is_ascii_digit() {
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(data[end] - b'0'))?;
        end += 1;
    }
    (end > pos).then_some((value, end))
}

/// Skip whitespace, then read an unsigned integer.
pub fn read_uint_after_ws(data: &[u8], pos: usize, hi: usize) -> Option<(u64, usize)> {
    read_uint(data, skip_whitespace(data, pos, hi), hi)
}

/// Read an indirect object header `N G obj` at `pos`.
///
/// Returns (object id, generation, position after `obj`).
pub fn read_object_header(data: &[u8], pos: usize, hi: usize) -> Option<(u32, u16, usize)> {
    let (id, pos) = read_uint_after_ws(data, pos, hi)?;
    let (generation, pos) = read_uint_after_ws(data, pos, hi)?;
    let pos = skip_whitespace(data, pos, hi);
    if data.get(pos..pos + 3)? != b"obj" || pos + 3 > hi {
        return None;
    }
    Some((
        u32::try_from(id).ok()?,
        u16::try_from(generation).ok()?,
        pos + 3,
    ))
}

/// Read an indirect reference `N G R` at `pos`, returning the object id.
pub fn read_reference(data: &[u8], pos: usize, hi: usize) -> Option<u32> {
    let (id, pos) = read_uint_after_ws(data, pos, hi)?;
    let (_generation, pos) = read_uint_after_ws(data, pos, hi)?;
    let pos = skip_whitespace(data, pos, hi);
    if pos < hi.min(data.len()) && data[pos] == b'R' {
        u32::try_from(id).ok()
    } else {
        None
    }
}

/// Read one line starting at `pos`, skipping any leading line terminators.
///
/// Returns the line content (without terminator) and the position of the
/// terminator that ended it, or `None` once `hi` is reached.
pub fn read_line(data: &[u8], pos: usize, hi: usize) -> Option<(&[u8], usize)> {
    let hi = hi.min(data.len());
    let mut start = pos;
    while start < hi && is_eol(data[start]) {
        start += 1;
    }
    if start >= hi {
        return None;
    }
    let mut end = start;
    while end < hi && !is_eol(data[end]) {
        end += 1;
    }
    Some((&data[start..end], end))
}

/// Trim trailing PDF whitespace.
pub fn trim_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && is_whitespace(line[end - 1]) {
        end -= 1;
    }
    &line[..end]
}

/// Trim leading PDF whitespace.
pub fn trim_start(line: &[u8]) -> &[u8] {
    let mut start = 0;
    while start < line.len() && is_whitespace(line[start]) {
        start += 1;
    }
    &line[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_search_respects_token_boundaries() {
        let data = b"startxref\n120\nxref\n";
        assert_eq!(find_keyword(data, 0, data.len(), b"xref"), Some(14));
        assert_eq!(rfind_keyword(data, 0, 14, b"xref"), None);
        assert_eq!(rfind_keyword(data, 0, data.len(), b"startxref"), Some(0));
    }

    #[test]
    fn searches_are_clamped_to_window() {
        let data = b"%%EOF abc %%EOF";
        assert_eq!(find(data, 1, data.len(), b"%%EOF"), Some(10));
        assert_eq!(find(data, 1, 12, b"%%EOF"), None);
        assert_eq!(rfind(data, 0, 100, b"%%EOF"), Some(10));
        assert_eq!(find(data, 40, 100, b"%%EOF"), None);
    }

    #[test]
    fn name_search_skips_longer_names() {
        let data = b"/Type1 /Typeface /Type /Page";
        assert_eq!(find_name(data, 0, data.len(), b"/Type"), Some(17));
        let trailer = b"<< /Size 4 /SizeHint 9 >>";
        assert_eq!(rfind_name(trailer, 0, trailer.len(), b"/Size"), Some(3));
        assert_eq!(rfind_name(trailer, 0, 3, b"/Size"), None);
    }

    #[test]
    fn reads_numbers_and_references() {
        let data = b"  42 0 R";
        assert_eq!(read_uint_after_ws(data, 0, data.len()), Some((42, 4)));
        assert_eq!(read_reference(data, 0, data.len()), Some(42));
        assert_eq!(read_uint(b"abc", 0, 3), None);
        assert_eq!(read_uint(b"99999999999999999999999", 0, 23), None);
    }

    #[test]
    fn reads_object_headers() {
        let data = b"12 0 obj\n<< >>";
        assert_eq!(read_object_header(data, 0, data.len()), Some((12, 0, 8)));
        assert_eq!(read_object_header(b"12 0 R", 0, 6), None);
    }

    #[test]
    fn reads_lines_across_mixed_terminators() {
        let data = b"xref\r\n0 1\r\n";
        let (line, end) = read_line(data, 4, data.len()).unwrap();
        assert_eq!(line, b"0 1");
        assert_eq!(end, 9);
        assert!(read_line(data, end, data.len()).is_none());
    }
}
