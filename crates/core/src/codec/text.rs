//! PDF text string decoding for document info values.
//!
//! Literal strings are passed through verbatim (bytes mapped through
//! Latin-1). Hex strings carrying the `FEFF` byte order mark are decoded as
//! UTF-16BE; other hex strings are left as they appear in the file.

/// How a raw info value was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// `( ... )` literal, or any other non-hex token.
    Literal,
    /// `<FEFF ...>` hex string.
    Utf16BeHex,
    /// Hex string without a UTF-16BE byte order mark.
    UnsupportedHex,
}

/// Classify a raw value by its leading bytes.
pub fn detect_encoding(raw: &[u8]) -> TextEncoding {
    match raw.first() {
        Some(b'<') => {
            let digits = hex_digits(&raw[1..]);
            if digits.len() >= 4 && digits[..4].eq_ignore_ascii_case(b"FEFF") {
                TextEncoding::Utf16BeHex
            } else {
                TextEncoding::UnsupportedHex
            }
        }
        _ => TextEncoding::Literal,
    }
}

/// Decode a raw info value into display text.
pub fn decode_text_string(raw: &[u8]) -> String {
    match detect_encoding(raw) {
        TextEncoding::Utf16BeHex => {
            let bytes = decode_hex(&raw[1..]);
            decode_utf16be(&bytes[2..])
        }
        TextEncoding::Literal | TextEncoding::UnsupportedHex => latin1(raw),
    }
}

/// Hex digits of a hex string body, stopping at `>` and skipping whitespace.
fn hex_digits(body: &[u8]) -> Vec<u8> {
    body.iter()
        .copied()
        .take_while(|&b| b != b'>')
        .filter(u8::is_ascii_hexdigit)
        .collect()
}

/// Decode hex digits two at a time; an odd trailing digit is padded with 0.
pub fn decode_hex(body: &[u8]) -> Vec<u8> {
    hex_digits(body)
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0]);
            let lo = pair.get(1).map_or(0, |&d| hex_value(d));
            (hi << 4) | lo
        })
        .collect()
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

fn decode_utf16be(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn latin1(raw: &[u8]) -> String {
    raw.iter().map(|&b| char::from(b)).collect()
}
