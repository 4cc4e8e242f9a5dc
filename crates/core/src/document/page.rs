//! Page tree walking for page-number lookups.
//!
//! Follows the trailer's `/Root` to the catalog, the catalog's `/Pages` to the
//! tree root, then every `/Kids` array depth first. The walk keeps an explicit
//! work list and a visited set, so cyclic or self-referencing trees end.

use super::info::trailer_reference;
use super::object::type_value;
use super::revision::{PDFRevision, adjacent_linear, resolve_object};
use super::source::PdfBytes;
use crate::parser::scan;
use rustc_hash::FxHashSet;

/// Object ids reachable through `/Kids` from revision `index`'s page tree
/// root, in depth-first pre-order. The root itself is not included.
pub(crate) fn page_kids(source: &PdfBytes, revisions: &[PDFRevision], index: usize) -> Vec<u32> {
    let Some(root_pages) = pages_root(source, revisions, index) else {
        return Vec::new();
    };
    // No tree can list more distinct objects than the document knows about.
    let limit: usize = revisions.iter().map(|r| r.entries.len()).sum();

    let mut kids = Vec::new();
    let mut visited = FxHashSet::default();
    visited.insert(root_pages);
    let mut stack = vec![root_pages];

    while let Some(node) = stack.pop() {
        if node != root_pages {
            kids.push(node);
        }
        let Some(object) = resolve_object(source, revisions, index, node) else {
            continue;
        };
        let refs = kid_refs(object.bytes());
        for &kid in refs.iter().rev() {
            if visited.len() > limit {
                tracing::warn!(limit, "page tree walk hit the object bound");
                return kids;
            }
            if visited.insert(kid) {
                stack.push(kid);
            }
        }
    }
    kids
}

/// 1-based position of `obj_id` among the `/Type /Page` leaves of revision
/// `index`'s page tree.
pub(crate) fn page_number(
    source: &PdfBytes,
    revisions: &[PDFRevision],
    index: usize,
    obj_id: u32,
) -> Option<usize> {
    page_kids(source, revisions, index)
        .into_iter()
        .filter(|&kid| {
            resolve_object(source, revisions, index, kid)
                .is_some_and(|obj| !obj.is_stream() && type_value(obj.bytes()) == Some(&b"Page"[..]))
        })
        .position(|kid| kid == obj_id)
        .map(|pos| pos + 1)
}

fn pages_root(source: &PdfBytes, revisions: &[PDFRevision], index: usize) -> Option<u32> {
    let data = source.as_slice();
    let revision = revisions.get(index)?;
    if !revision.is_valid() {
        return None;
    }
    let root = trailer_reference(data, revision, b"/Root").or_else(|| {
        adjacent_linear(revisions, index).find_map(|r| trailer_reference(data, r, b"/Root"))
    })?;
    let catalog = resolve_object(source, revisions, index, root)?;
    reference_after(catalog.bytes(), b"/Pages")
}

/// The first `/Key N G R` reference in `body`.
fn reference_after(body: &[u8], key: &[u8]) -> Option<u32> {
    let mut from = 0;
    while let Some(pos) = scan::find_name(body, from, body.len(), key) {
        if let Some(id) = scan::read_reference(body, pos + key.len(), body.len()) {
            return Some(id);
        }
        from = pos + 1;
    }
    None
}

/// Object ids listed in the `/Kids [ ... ]` array of `body`.
fn kid_refs(body: &[u8]) -> Vec<u32> {
    let Some(key) = scan::find_name(body, 0, body.len(), b"/Kids") else {
        return Vec::new();
    };
    let mut pos = scan::skip_whitespace(body, key + b"/Kids".len(), body.len());
    if body.get(pos) != Some(&b'[') {
        return Vec::new();
    }
    pos += 1;

    let mut refs = Vec::new();
    loop {
        pos = scan::skip_whitespace(body, pos, body.len());
        let Some((id, after_id)) = scan::read_uint(body, pos, body.len()) else {
            break;
        };
        let Some((_generation, after_gen)) = scan::read_uint_after_ws(body, after_id, body.len())
        else {
            break;
        };
        let r = scan::skip_whitespace(body, after_gen, body.len());
        if body.get(r) != Some(&b'R') {
            break;
        }
        if let Ok(id) = u32::try_from(id) {
            refs.push(id);
        }
        pos = r + 1;
    }
    refs
}
