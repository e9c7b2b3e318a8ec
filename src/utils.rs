//! Utility functions for binary parsing and string conversion.

use crate::error::{FormatError, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::UTF_16LE;

/// Width of one UTF-16 code unit in bytes.
pub const CODE_UNIT_SIZE: usize = 2;

/// `[` encoded as a UTF-16LE code unit.
pub const OPEN_BRACKET: [u8; CODE_UNIT_SIZE] = wide(b'[');

/// `;` encoded as a UTF-16LE code unit.
pub const SEPARATOR: [u8; CODE_UNIT_SIZE] = wide(b';');

/// `]` encoded as a UTF-16LE code unit.
pub const CLOSE_BRACKET: [u8; CODE_UNIT_SIZE] = wide(b']');

/// Encodes an ASCII character as a single UTF-16LE code unit.
const fn wide(c: u8) -> [u8; CODE_UNIT_SIZE] {
    [c, 0]
}

/// Reads a UTF-16LE string from a byte slice, trimming null terminators.
///
/// Strings in policy files are usually null-terminated. This function decodes
/// UTF-16LE data (without byte order mark sniffing) and removes trailing null
/// characters. Embedded nulls are preserved.
///
/// # Errors
///
/// Returns an error if the data length is not even (UTF-16 requires 2-byte units)
/// or if the UTF-16 decoding fails.
pub fn read_utf16_string(data: &[u8], offset: usize) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }

    // UTF-16 requires even number of bytes
    if data.len() % CODE_UNIT_SIZE != 0 {
        return Err(FormatError::InvalidUtf16 { offset });
    }

    let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(data);

    if had_errors {
        return Err(FormatError::InvalidUtf16 { offset });
    }

    Ok(decoded.trim_end_matches('\0').to_string())
}

/// Returns `len` bytes at `offset`, or a truncation error.
fn read_bytes(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| FormatError::truncated(offset, len, data.len().saturating_sub(offset)))
}

/// Reads a little-endian u32 from a byte slice at the given offset.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    read_bytes(data, offset, 4).map(LittleEndian::read_u32)
}

/// Reads a big-endian u32 from a byte slice at the given offset.
pub fn read_u32_be(data: &[u8], offset: usize) -> Result<u32> {
    read_bytes(data, offset, 4).map(BigEndian::read_u32)
}

/// Reads a little-endian u64 from a byte slice at the given offset.
pub fn read_u64_le(data: &[u8], offset: usize) -> Result<u64> {
    read_bytes(data, offset, 8).map(LittleEndian::read_u64)
}

/// Finds the first code-unit-aligned occurrence of `unit` in `data`.
///
/// Only even positions are considered, so the high byte of one character and
/// the low byte of the next never match as a delimiter.
pub fn find_code_unit(data: &[u8], unit: [u8; CODE_UNIT_SIZE]) -> Option<usize> {
    data.chunks_exact(CODE_UNIT_SIZE)
        .position(|chunk| chunk == &unit[..])
        .map(|index| index * CODE_UNIT_SIZE)
}
