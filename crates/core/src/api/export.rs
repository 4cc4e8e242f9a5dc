//! Writing recovered versions and scrubbed copies.
//!
//! A historical version is recreated by appending a fresh `startxref` that
//! names that version's xref; readers then ignore everything the later
//! revisions changed.

use crate::document::revision::previous_revision;
use crate::document::{PDFDocument, RevisionDiffStatus};
use crate::error::Result;
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fill byte used to blank out scrubbed objects.
pub const SCRUB_FILL: u8 = b'0';

/// The file's bytes, re-terminated so that revision `revision_index` is the
/// one a reader opens. `None` for placeholder or missing revisions.
pub fn version_bytes(doc: &PDFDocument, revision_index: usize) -> Option<Vec<u8>> {
    let revision = doc.revision(revision_index).filter(|r| r.is_valid())?;
    let tail = format!("\r\nstartxref\r\n{}\r\n%%EOF", revision.start);
    let mut out = Vec::with_capacity(doc.bytes().len() + tail.len());
    out.extend_from_slice(doc.bytes());
    out.extend_from_slice(tail.as_bytes());
    Some(out)
}

/// File stem used for derived output names (`report.pdf` -> `report`).
pub fn output_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map_or_else(|| name.to_string(), |s| s.to_string_lossy().into_owned())
}

pub fn versions_dir_name(stem: &str) -> String {
    format!("{stem}-versions")
}

pub fn version_file_name(stem: &str, version: u32) -> String {
    format!("{stem}-version-{version}.pdf")
}

pub fn summary_file_name(stem: &str) -> String {
    format!("{stem}.summary")
}

pub fn scrubbed_file_name(stem: &str) -> String {
    format!("{stem}-scrubbed.pdf")
}

/// Create `dir` and write one file per valid version into it.
///
/// Fails without writing anything if `dir` already exists.
pub fn write_versions(doc: &PDFDocument, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir(dir)?;

    let mut written = Vec::new();
    for (ri, revision) in doc.revisions().iter().enumerate() {
        let Some(bytes) = version_bytes(doc, ri) else {
            continue;
        };
        let path = dir.join(version_file_name(stem, revision.version));
        fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), version = revision.version, "wrote version");
        written.push(path);
    }
    Ok(written)
}

/// Copy of the document with stale object bodies overwritten.
///
/// Whenever a version modifies or deletes an object, the body it inherited
/// from the previous version is filled with [`SCRUB_FILL`]. Bodies the latest
/// version still reaches are never touched. Offsets and the file length are
/// unchanged.
pub fn scrub(doc: &PDFDocument) -> Vec<u8> {
    let mut out = doc.bytes().to_vec();
    let live = live_offsets(doc);

    for (ri, revision) in doc.revisions().iter().enumerate() {
        if !revision.is_valid() {
            continue;
        }
        let Some(previous) = previous_revision(doc.revisions(), ri) else {
            continue;
        };
        for (ei, entry) in revision.entries.iter().enumerate() {
            if entry.obj_id == 0 {
                continue;
            }
            if !matches!(
                doc.object_status(ri, ei),
                Some(RevisionDiffStatus::Modified | RevisionDiffStatus::Deleted)
            ) {
                continue;
            }
            let Some(object) = doc.find_object(entry.obj_id, previous) else {
                continue;
            };
            if live.contains(&object.offset()) {
                continue;
            }
            let end = (object.offset() + object.len()).min(out.len());
            out[object.offset()..end].fill(SCRUB_FILL);
            tracing::debug!(
                obj_id = entry.obj_id,
                version = revision.version,
                offset = object.offset(),
                "scrubbed superseded object"
            );
        }
    }
    out
}

/// Offsets of the bodies the latest version resolves each object id to.
///
/// The newest table listing an id decides: in use keeps its offset live, a
/// free entry leaves nothing live for that id.
fn live_offsets(doc: &PDFDocument) -> FxHashSet<usize> {
    let mut newest_first: Vec<_> = doc.revisions().iter().filter(|r| r.is_valid()).collect();
    newest_first.sort_by_key(|r| Reverse(r.version));

    let mut decided = FxHashSet::default();
    let mut live = FxHashSet::default();
    for revision in newest_first {
        for entry in &revision.entries {
            if decided.insert(entry.obj_id)
                && entry.in_use
                && let Ok(offset) = usize::try_from(entry.offset)
            {
                live.insert(offset);
            }
        }
    }
    live
}

/// Write [`scrub`]'s output to `path`, refusing to replace an existing file.
pub fn write_scrubbed(doc: &PDFDocument, path: &Path) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(&scrub(doc))?;
    Ok(())
}
