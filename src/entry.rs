//! Registry policy entry (record) decoding.
//!
//! Entries follow the header back-to-back. Each one is framed as
//!
//! ```text
//! [key;value;type;size;data]
//! ```
//!
//! Brackets, separators, key and value are UTF-16LE. `type` and `size` are
//! raw little-endian u32s and `data` is `size` bytes interpreted per `type`.

use crate::error::{FormatError, Result};
use crate::utils::{
    find_code_unit, read_u32_le, read_utf16_string, CLOSE_BRACKET, CODE_UNIT_SIZE, OPEN_BRACKET,
    SEPARATOR,
};
use crate::value::{ValueData, ValueType};
use std::fmt;

/// Number of `;`-separated fields inside the brackets.
const FIELD_COUNT: usize = 5;

/// Width of the `type` and `size` fields.
const INTEGER_FIELD_SIZE: usize = 4;

/// Field indices of `type` and `size`.
const TYPE_FIELD: usize = 2;
const SIZE_FIELD: usize = 3;

/// A decoded policy entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    /// Registry key path.
    pub key: String,

    /// Value name under the key.
    pub value: String,

    /// Declared value type.
    pub value_type: ValueType,

    /// Declared payload size in bytes.
    pub size: u32,

    /// Decoded payload; its variant always matches `value_type`.
    pub data: ValueData,
}

/// One undecoded field with its absolute position in the buffer.
#[derive(Debug, Clone, Copy)]
struct RawField<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl RawField<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }
}

impl Entry {
    /// Decodes the entry starting at `offset`.
    ///
    /// # Arguments
    ///
    /// * `data` - The whole policy buffer.
    /// * `offset` - Offset of the entry's opening bracket.
    ///
    /// # Returns
    ///
    /// The entry and the number of bytes it occupies, closing bracket included.
    ///
    /// # Errors
    ///
    /// Returns an error if the framing is broken, a field is truncated, the
    /// type code is unknown or undecodable, or the text is not valid UTF-16.
    /// All error offsets are absolute positions in `data`.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let record = data.get(offset..).unwrap_or_default();
        if !record.starts_with(&OPEN_BRACKET) {
            return Err(FormatError::MissingOpenBracket { offset });
        }

        let [raw_key, raw_value, raw_type, raw_size, raw_data] = split_fields(data, offset)?;

        let key = read_utf16_string(raw_key.bytes, raw_key.offset)?;
        let value = read_utf16_string(raw_value.bytes, raw_value.offset)?;

        let code = read_u32_le(&data[..raw_type.end()], raw_type.offset)?;
        let value_type = ValueType::from_u32(code).ok_or(FormatError::UnknownType {
            offset: raw_type.offset,
            code,
        })?;

        let size = read_u32_le(&data[..raw_size.end()], raw_size.offset)?;

        let payload_len = value_type
            .payload_len(size)
            .ok_or(FormatError::UnsupportedType {
                offset: raw_type.offset,
                value_type,
            })?;
        let payload = raw_data.bytes.get(..payload_len).ok_or_else(|| {
            FormatError::truncated(raw_data.offset, payload_len, raw_data.len())
        })?;

        // raw_data.offset is offset + '[' + key + ';' + value + ';' + type + ';' + size + ';',
        // so the bracket must sit exactly `size` bytes after it.
        let close = raw_data.offset.saturating_add(size as usize);
        let found = data
            .get(close..)
            .and_then(|rest| rest.get(..CODE_UNIT_SIZE));
        if found != Some(&CLOSE_BRACKET[..]) {
            return Err(FormatError::MissingCloseBracket {
                offset: close,
                found: found.and_then(|bytes| bytes.try_into().ok()),
            });
        }

        let value_data = ValueData::parse(payload, value_type, raw_data.offset)?;

        let entry = Entry {
            key,
            value,
            value_type,
            size,
            data: value_data,
        };
        Ok((entry, close + CLOSE_BRACKET.len() - offset))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \\ {} = {}", self.key, self.value, self.data)
    }
}

/// Splits the record after its opening bracket into its five fields.
///
/// At most four separators are consumed; the data field takes everything
/// after the fourth, including any separator-shaped bytes in the payload.
fn split_fields(data: &[u8], offset: usize) -> Result<[RawField<'_>; FIELD_COUNT]> {
    let mut fields = [RawField {
        offset: data.len(),
        bytes: &[],
    }; FIELD_COUNT];
    let mut cursor = offset + OPEN_BRACKET.len();

    for (index, field) in fields.iter_mut().take(FIELD_COUNT - 1).enumerate() {
        let rest = &data[cursor..];
        let len = separator_position(rest, index).ok_or(FormatError::MalformedRecord {
            offset,
            fields: index + 1,
        })?;
        *field = RawField {
            offset: cursor,
            bytes: &rest[..len],
        };
        cursor += len + SEPARATOR.len();
    }

    fields[FIELD_COUNT - 1] = RawField {
        offset: cursor,
        bytes: &data[cursor..],
    };
    Ok(fields)
}

/// Finds the separator ending field `index` within `rest`.
///
/// `type` and `size` are binary integers whose bytes may look like a
/// separator, so a separator right after their 4 bytes wins.
fn separator_position(rest: &[u8], index: usize) -> Option<usize> {
    let integer_field = index == TYPE_FIELD || index == SIZE_FIELD;
    let after_integer = rest.get(INTEGER_FIELD_SIZE..INTEGER_FIELD_SIZE + SEPARATOR.len());
    if integer_field && after_integer == Some(&SEPARATOR[..]) {
        return Some(INTEGER_FIELD_SIZE);
    }
    find_code_unit(rest, SEPARATOR)
}
