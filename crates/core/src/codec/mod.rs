//! Codec modules for PDF string values.
//!
//! - `text`: info dictionary text string decoding

pub mod text;

pub use text::{TextEncoding, decode_text_string};
