//! Byte builders for unit test fixtures.

use crate::header::{POLICY_SIGNATURE, POLICY_VERSION};

/// Encodes text as UTF-16LE without adding a terminator.
pub fn wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Encodes one framed record with explicit type code and size.
pub fn record(key: &str, value: &str, code: u32, size: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = wide("[");
    out.extend(wide(key));
    out.extend(wide(";"));
    out.extend(wide(value));
    out.extend(wide(";"));
    out.extend(code.to_le_bytes());
    out.extend(wide(";"));
    out.extend(size.to_le_bytes());
    out.extend(wide(";"));
    out.extend_from_slice(payload);
    out.extend(wide("]"));
    out
}

/// Encodes a `REG_SZ` record whose size matches the payload.
pub fn string_record(key: &str, value: &str, text: &str) -> Vec<u8> {
    let payload = wide(&format!("{}\0", text));
    record(key, value, 1, payload.len() as u32, &payload)
}

/// Prepends a valid header to the given records.
pub fn policy(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = POLICY_SIGNATURE.to_le_bytes().to_vec();
    out.extend(POLICY_VERSION.to_le_bytes());
    for record in records {
        out.extend_from_slice(record);
    }
    out
}
