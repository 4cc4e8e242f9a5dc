//! Byte-level scanning over raw PDF data.
//!
//! - `scan`: bounded keyword search and small token readers

pub mod scan;
