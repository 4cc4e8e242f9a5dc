//! PDF revision history: the parsed document model.
//!
//! [`PDFDocument`] runs the whole pipeline on construction:
//! header check, `%%EOF` boundary scan, xref location per boundary, entry
//! table parsing, linearization resolution and info extraction. Everything
//! afterwards is a read-only query over the result.

use super::boundary::regions;
use super::info::{DEFAULT_MAX_VALUE_LEN, DocumentInfo, InfoOutcome, extract_info};
use super::linearization::resolve_linearized;
use super::object::{self, RawObject};
use super::page;
use super::revision::{PDFRevision, RevisionDiffStatus, classify, lookup_object, resolve_object};
use super::source::PdfBytes;
use super::xref::{self, XRefKind};
use crate::error::{PdfError, Result};
use crate::parser::scan;
use bytes::Bytes;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// How far into the file the `%PDF-` header may start.
pub const HEADER_SEARCH_LIMIT: usize = 1024;
const HEADER: &[u8] = b"%PDF-";

/// Name used when the caller supplies none.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Knobs for document loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Upper bound on the raw bytes kept for each info value.
    pub max_info_value_len: usize,
    /// Extract `/Info` dictionaries for every revision.
    pub load_info: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_info_value_len: DEFAULT_MAX_VALUE_LEN,
            load_info: true,
        }
    }
}

/// `%PDF-M.m` header version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PdfVersion {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A PDF file with its incremental revisions recovered.
#[derive(Debug)]
pub struct PDFDocument {
    name: String,
    data: PdfBytes,
    version: Option<PdfVersion>,
    revisions: Vec<PDFRevision>,
    has_xref_streams: bool,
    has_xml_metadata: bool,
}

impl PDFDocument {
    /// Parse a document from raw bytes.
    pub fn new<D: AsRef<[u8]>>(data: D, name: &str) -> Result<Self> {
        Self::new_with_options(data, name, LoadOptions::default())
    }

    pub fn new_with_options<D: AsRef<[u8]>>(data: D, name: &str, options: LoadOptions) -> Result<Self> {
        Self::load(PdfBytes::from_slice(data.as_ref()), name, options)
    }

    /// Parse a document from shared bytes (zero-copy).
    pub fn new_from_bytes(data: Bytes, name: &str) -> Result<Self> {
        Self::load(PdfBytes::Shared(data), name, LoadOptions::default())
    }

    /// Parse a document from a memory-mapped file.
    pub fn new_from_mmap(mmap: Mmap, name: &str, options: LoadOptions) -> Result<Self> {
        Self::load(PdfBytes::from_mmap(mmap), name, options)
    }

    /// Memory-map and parse the file at `path`, named after its base name.
    pub fn open<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // Safety: the file handle remains open for the duration of the map.
        let mmap = unsafe { Mmap::map(&file)? };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new_from_mmap(mmap, &name, options)
    }

    fn load(data: PdfBytes, name: &str, options: LoadOptions) -> Result<Self> {
        let name = if name.is_empty() { UNKNOWN_NAME } else { name };
        let version = check_header(data.as_slice())?;

        let mut doc = Self {
            name: name.to_string(),
            data,
            version,
            revisions: Vec::new(),
            has_xref_streams: false,
            has_xml_metadata: false,
        };
        doc.load_revisions()?;
        resolve_linearized(&mut doc.revisions);
        if options.load_info {
            doc.load_info(options.max_info_value_len);
        }

        tracing::debug!(
            name = %doc.name,
            revisions = doc.revisions.len(),
            versions = doc.valid_revision_count(),
            xref_streams = doc.has_xref_streams,
            "loaded revision history"
        );
        Ok(doc)
    }

    fn load_revisions(&mut self) -> Result<()> {
        let mut next_version = 1;
        for region in regions(self.data.as_slice()) {
            let Some(startxref) = xref::read_startxref(self.data.as_slice(), region) else {
                tracing::warn!(eof = region.eof, "no startxref before %%EOF; revision skipped");
                self.revisions.push(PDFRevision::placeholder(region.eof, false));
                continue;
            };

            let location = match xref::locate_xref(&self.data, region, startxref) {
                Ok(location) => location,
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(eof = region.eof, error = %err, "revision skipped");
                    self.revisions
                        .push(PDFRevision::placeholder(region.eof, startxref == 0));
                    continue;
                }
                Err(err) => return Err(err),
            };

            let mut revision = PDFRevision::from_location(&location, next_version);
            next_version += 1;
            match location.kind {
                XRefKind::Table => revision.entries = xref::parse_entries(&self.data, &location)?,
                XRefKind::Stream => self.has_xref_streams = true,
            }
            tracing::debug!(
                version = revision.version,
                start = revision.start,
                entries = revision.entries.len(),
                "parsed revision"
            );
            self.revisions.push(revision);
        }

        if self.revisions.is_empty() {
            return Err(PdfError::NoRevisionsFound);
        }
        Ok(())
    }

    fn load_info(&mut self, max_value_len: usize) {
        for index in 0..self.revisions.len() {
            match extract_info(&self.data, &self.revisions, index, max_value_len) {
                InfoOutcome::Legacy(info) => self.revisions[index].info = Some(info),
                InfoOutcome::XmlMetadata => self.has_xml_metadata = true,
                InfoOutcome::Missing => {}
            }
        }
    }

    /// Display name: the file's base name, or `"Unknown"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Header version, when the `%PDF-` header carries a readable one.
    pub const fn pdf_version(&self) -> Option<PdfVersion> {
        self.version
    }

    /// Number of revision slots, placeholders included.
    pub fn revision_count(&self) -> usize {
        self.revisions.len()
    }

    /// Number of revisions with a usable xref (versions 1..=N).
    pub fn valid_revision_count(&self) -> usize {
        self.revisions.iter().filter(|r| r.is_valid()).count()
    }

    pub fn revision(&self, index: usize) -> Option<&PDFRevision> {
        self.revisions.get(index)
    }

    pub fn revisions(&self) -> &[PDFRevision] {
        &self.revisions
    }

    /// Change status of entry `entry_index` in revision `revision_index`.
    pub fn object_status(&self, revision_index: usize, entry_index: usize) -> Option<RevisionDiffStatus> {
        classify(&self.revisions, revision_index, entry_index)
    }

    /// Raw bytes of object `obj_id` listed by revision `revision_index`.
    ///
    /// `None` when that revision's table has no in-use entry for the id.
    pub fn object_bytes(&self, obj_id: u32, revision_index: usize) -> Option<RawObject> {
        lookup_object(&self.data, &self.revisions, revision_index, obj_id)
    }

    /// Raw bytes of object `obj_id` as a reader of revision `revision_index`
    /// sees it, falling back to the earlier versions it inherits from.
    pub fn find_object(&self, obj_id: u32, revision_index: usize) -> Option<RawObject> {
        resolve_object(&self.data, &self.revisions, revision_index, obj_id)
    }

    /// `"Stream"`, the `/Type` value of [`Self::find_object`]'s result, or
    /// `"Unknown"`.
    pub fn object_type(&self, obj_id: u32, revision_index: usize) -> String {
        object::object_type(self.find_object(obj_id, revision_index).as_ref())
    }

    pub fn document_info(&self, revision_index: usize) -> Option<&DocumentInfo> {
        self.revisions.get(revision_index)?.info.as_ref()
    }

    /// At least one revision uses a cross-reference stream.
    pub const fn has_xref_streams(&self) -> bool {
        self.has_xref_streams
    }

    /// At least one `/Info` reference named an XML metadata stream.
    pub const fn has_xml_metadata(&self) -> bool {
        self.has_xml_metadata
    }

    /// Page tree nodes of revision `revision_index`, depth-first.
    pub fn page_kids(&self, revision_index: usize) -> Vec<u32> {
        page::page_kids(&self.data, &self.revisions, revision_index)
    }

    /// 1-based page number of `obj_id` in revision `revision_index`.
    pub fn page_number(&self, revision_index: usize, obj_id: u32) -> Option<usize> {
        page::page_number(&self.data, &self.revisions, revision_index, obj_id)
    }
}

/// Require `%PDF-` near the start and read the version that follows it.
fn check_header(data: &[u8]) -> Result<Option<PdfVersion>> {
    let pos = scan::find(data, 0, HEADER_SEARCH_LIMIT, HEADER)
        .ok_or(PdfError::NotAPdf(HEADER_SEARCH_LIMIT))?;
    let hi = (pos + 16).min(data.len());
    let version = scan::read_uint(data, pos + HEADER.len(), hi).and_then(|(major, end)| {
        if data.get(end) != Some(&b'.') {
            return None;
        }
        let (minor, _) = scan::read_uint(data, end + 1, hi)?;
        Some(PdfVersion {
            major: u32::try_from(major).ok()?,
            minor: u32::try_from(minor).ok()?,
        })
    });
    Ok(version)
}
