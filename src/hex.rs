//! Reversible hex-source-literal rendering of a container, for embedding
//! compressed images as constant byte arrays in firmware.
//!
//! Output is a stream of `0xNN` tokens, comma-separated, 16 per line. The
//! parser scans for `0x` prefixes and ignores everything else, so array
//! boilerplate, braces and comments around the tokens are harmless.

use alloc::string::String;
use alloc::vec::Vec;

use crate::container::Container;
use crate::error::PlaneError;

/// Render bytes as `0xNN` tokens, 16 per line.
pub fn to_hex_literal(data: &[u8]) -> String {
    // "0xNN," is 5 chars, plus a newline every 16 tokens
    let mut out = String::with_capacity(data.len() * 5 + data.len() / 16 + 2);
    for (i, byte) in data.iter().enumerate() {
        out.push_str("0x");
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0xf) as usize] as char);
        if i + 1 < data.len() {
            out.push(',');
        }
        if (i + 1) % 16 == 0 {
            out.push('\n');
        }
    }
    out
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Parse `0xNN` tokens back to bytes.
///
/// Scans for `0x` prefixes anywhere in the text; each must be followed by
/// exactly two hex digits (either case). Text between tokens is skipped.
pub fn from_hex_literal(text: &str) -> Result<Vec<u8>, PlaneError> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'0' && bytes[i + 1] == b'x' {
            let hi = bytes
                .get(i + 2)
                .and_then(|&c| hex_nibble(c))
                .ok_or_else(|| bad_token(text, i))?;
            let lo = bytes
                .get(i + 3)
                .and_then(|&c| hex_nibble(c))
                .ok_or_else(|| bad_token(text, i))?;
            out.push((hi << 4) | lo);
            i += 4;
        } else {
            i += 1;
        }
    }
    Ok(out)
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn bad_token(text: &str, offset: usize) -> PlaneError {
    let token = text
        .get(offset..(offset + 4).min(text.len()))
        .unwrap_or("0x");
    PlaneError::InvalidHexLiteral(alloc::format!("malformed token {token:?} at byte {offset}"))
}

/// Parse a hex source literal and decode the container it embeds,
/// re-validating the marker.
pub fn container_from_source(text: &str) -> Result<Container, PlaneError> {
    let bytes = from_hex_literal(text)?;
    Container::decode(&bytes)
}
