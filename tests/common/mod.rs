//! Fixture encoder for building policy files in tests.
//!
//! The library is decode-only; this writes the same layout it reads.

#![allow(dead_code)]

use reg_pol::{Entry, ValueData};

/// A valid header: "PReg", version 1.
pub const HEADER: [u8; 8] = [0x50, 0x52, 0x65, 0x67, 0x01, 0x00, 0x00, 0x00];

/// Encodes text as UTF-16LE without adding a terminator.
pub fn wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Encodes a payload the way Windows writes it.
pub fn encode_data(data: &ValueData) -> Vec<u8> {
    match data {
        ValueData::String(s) | ValueData::ExpandString(s) | ValueData::Link(s) => {
            wide(&format!("{}\0", s))
        }
        ValueData::Binary(b) => b.clone(),
        ValueData::Dword(d) => d.to_le_bytes().to_vec(),
        ValueData::DwordBigEndian(d) => d.to_be_bytes().to_vec(),
        ValueData::MultiString(strings) if strings.is_empty() => Vec::new(),
        ValueData::MultiString(strings) => wide(&format!("{}\0\0", strings.join("\0"))),
        ValueData::Qword(q) => q.to_le_bytes().to_vec(),
    }
}

/// Encodes one framed record. Key and value get a NUL terminator.
pub fn encode_record(key: &str, value: &str, code: u32, size: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = wide("[");
    out.extend(wide(&format!("{}\0", key)));
    out.extend(wide(";"));
    out.extend(wide(&format!("{}\0", value)));
    out.extend(wide(";"));
    out.extend(code.to_le_bytes());
    out.extend(wide(";"));
    out.extend(size.to_le_bytes());
    out.extend(wide(";"));
    out.extend_from_slice(payload);
    out.extend(wide("]"));
    out
}

/// Encodes an entry using its own type code and size.
pub fn encode_entry(entry: &Entry) -> Vec<u8> {
    encode_record(
        &entry.key,
        &entry.value,
        entry.value_type.code(),
        entry.size,
        &encode_data(&entry.data),
    )
}

/// Builds an entry whose size matches its encoded payload.
pub fn entry(key: &str, value: &str, data: ValueData) -> Entry {
    Entry {
        key: key.to_string(),
        value: value.to_string(),
        value_type: data.value_type(),
        size: encode_data(&data).len() as u32,
        data,
    }
}

/// Builds a complete policy file from entries.
pub fn policy_bytes(entries: &[Entry]) -> Vec<u8> {
    let mut out = HEADER.to_vec();
    for entry in entries {
        out.extend(encode_entry(entry));
    }
    out
}
