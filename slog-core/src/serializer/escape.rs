//! JSON string escaping, byte by byte.
//!
//! Bytes at or above 0x20 other than `"` and `\` pass through untouched, so
//! multi-byte UTF-8 sequences (and malformed ones) are copied verbatim.

use crate::alloc::OutputBuffer;
use crate::error::SlogError;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `bytes` to `out` with JSON escapes applied. No quotes are added.
pub fn escape_into(out: &mut OutputBuffer, bytes: &[u8]) -> Result<(), SlogError> {
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let short: &[u8] = match b {
            b'\\' => b"\\\\",
            b'"' => b"\\\"",
            0x08 => b"\\b",
            0x0c => b"\\f",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x00..=0x1f => {
                out.append(&bytes[start..i])?;
                out.append(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[usize::from(b >> 4)],
                    HEX[usize::from(b & 0x0f)],
                ])?;
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        out.append(&bytes[start..i])?;
        out.append(short)?;
        start = i + 1;
    }
    out.append(&bytes[start..])
}
