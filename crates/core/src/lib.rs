//! exhume - recover the revision history of incrementally saved PDF files.
//!
//! Every `%%EOF` in a PDF closes one revision. [`document::PDFDocument`]
//! finds those revisions, parses their cross-reference tables and trailers,
//! and answers which objects each version added, modified or deleted.

pub mod api;
pub mod codec;
pub mod document;
pub mod error;
pub mod parser;

pub use document::{LoadOptions, PDFDocument};
pub use error::{PdfError, Result};
