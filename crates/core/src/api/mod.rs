//! High-level API module for revision reports and exports.
//!
//! # Example
//!
//! ```ignore
//! use exhume_core::api::report::summarize;
//! use exhume_core::document::{LoadOptions, PDFDocument};
//!
//! let doc = PDFDocument::open("document.pdf", LoadOptions::default())?;
//! summarize(&mut std::io::stdout(), &doc, false)?;
//! ```

pub mod export;
pub mod report;

// Re-export for convenience
pub use export::{scrub, version_bytes, write_scrubbed, write_versions};
pub use report::{display_info, single_version_notice, summarize};
