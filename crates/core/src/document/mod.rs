//! Document module - revision boundaries, xref tables, and history queries.
//!
//! This module contains:
//! - `source` - immutable byte source (owned or memory-mapped)
//! - `boundary` - `%%EOF` revision boundary scanning
//! - `xref` - xref location and entry table parsing
//! - `object` - raw object extraction and type lookup
//! - `revision` - revisions and change classification
//! - `linearization` - linearized first-page table handling
//! - `info` - document information dictionaries
//! - `page` - page tree walking
//! - `history` - the parsed document (PDFDocument)

pub mod boundary;
pub mod history;
pub mod info;
pub mod linearization;
pub mod object;
pub mod page;
pub mod revision;
pub mod source;
pub mod xref;

// Re-export main types for convenience
pub use history::{LoadOptions, PDFDocument, PdfVersion};
pub use info::{DocumentInfo, InfoKey};
pub use object::RawObject;
pub use revision::{PDFRevision, RevisionDiffStatus};
pub use source::PdfBytes;
pub use xref::{XRefEntry, XRefKind};
