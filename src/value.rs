//! Registry value types and typed payload decoding.

use crate::error::{FormatError, Result};
use crate::utils::{read_u32_be, read_u32_le, read_u64_le, read_utf16_string};
use std::fmt;

/// Registry value data types.
///
/// Codes 4 and 11 each have a second Win32 name; those are associated
/// constants ([`ValueType::DWORD_LITTLE_ENDIAN`], [`ValueType::QWORD_LITTLE_ENDIAN`])
/// rather than separate variants since they decode identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValueType {
    /// No value type.
    None,

    /// String (null-terminated).
    String,

    /// String with environment variables.
    ExpandString,

    /// Binary data.
    Binary,

    /// 32-bit little-endian integer.
    Dword,

    /// 32-bit big-endian integer.
    DwordBigEndian,

    /// Symbolic link (Unicode).
    Link,

    /// Multiple strings.
    MultiString,

    /// Resource list.
    ResourceList,

    /// Full resource descriptor.
    FullResourceDescriptor,

    /// Resource requirements list.
    ResourceRequirementsList,

    /// 64-bit little-endian integer.
    Qword,
}

impl ValueType {
    /// Alias of [`ValueType::Dword`] (`REG_DWORD_LITTLE_ENDIAN`).
    pub const DWORD_LITTLE_ENDIAN: ValueType = ValueType::Dword;

    /// Alias of [`ValueType::Qword`] (`REG_QWORD_LITTLE_ENDIAN`).
    pub const QWORD_LITTLE_ENDIAN: ValueType = ValueType::Qword;

    /// Every defined value type, in code order.
    pub const ALL: [ValueType; 12] = [
        ValueType::None,
        ValueType::String,
        ValueType::ExpandString,
        ValueType::Binary,
        ValueType::Dword,
        ValueType::DwordBigEndian,
        ValueType::Link,
        ValueType::MultiString,
        ValueType::ResourceList,
        ValueType::FullResourceDescriptor,
        ValueType::ResourceRequirementsList,
        ValueType::Qword,
    ];

    /// Maps a type code to a value type.
    ///
    /// Returns `None` for codes outside 0-11.
    pub fn from_u32(value: u32) -> Option<Self> {
        let index = usize::try_from(value).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Returns the numeric type code.
    pub fn code(&self) -> u32 {
        match self {
            ValueType::None => 0,
            ValueType::String => 1,
            ValueType::ExpandString => 2,
            ValueType::Binary => 3,
            ValueType::Dword => 4,
            ValueType::DwordBigEndian => 5,
            ValueType::Link => 6,
            ValueType::MultiString => 7,
            ValueType::ResourceList => 8,
            ValueType::FullResourceDescriptor => 9,
            ValueType::ResourceRequirementsList => 10,
            ValueType::Qword => 11,
        }
    }

    /// Returns the Win32 name of this value type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::None => "REG_NONE",
            ValueType::String => "REG_SZ",
            ValueType::ExpandString => "REG_EXPAND_SZ",
            ValueType::Binary => "REG_BINARY",
            ValueType::Dword => "REG_DWORD",
            ValueType::DwordBigEndian => "REG_DWORD_BIG_ENDIAN",
            ValueType::Link => "REG_LINK",
            ValueType::MultiString => "REG_MULTI_SZ",
            ValueType::ResourceList => "REG_RESOURCE_LIST",
            ValueType::FullResourceDescriptor => "REG_FULL_RESOURCE_DESCRIPTOR",
            ValueType::ResourceRequirementsList => "REG_RESOURCE_REQUIREMENTS_LIST",
            ValueType::Qword => "REG_QWORD",
        }
    }

    /// Returns how many leading payload bytes a value of this type reads.
    ///
    /// Fixed-width integers read 4 or 8 bytes whatever `size` declares;
    /// everything else reads exactly `size` bytes. Returns `None` for types
    /// with no decode rule.
    pub fn payload_len(&self, size: u32) -> Option<usize> {
        match self {
            ValueType::Dword | ValueType::DwordBigEndian => Some(4),
            ValueType::Qword => Some(8),
            ValueType::String
            | ValueType::ExpandString
            | ValueType::Link
            | ValueType::Binary
            | ValueType::MultiString => usize::try_from(size).ok(),
            ValueType::None
            | ValueType::ResourceList
            | ValueType::FullResourceDescriptor
            | ValueType::ResourceRequirementsList => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded registry value data.
///
/// The variant always corresponds to the entry's [`ValueType`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ValueData {
    /// String value.
    String(String),

    /// Expandable string value. `%VAR%` references are left unexpanded.
    ExpandString(String),

    /// Binary data.
    Binary(Vec<u8>),

    /// 32-bit integer.
    Dword(u32),

    /// 32-bit big-endian integer.
    DwordBigEndian(u32),

    /// Symbolic link target.
    Link(String),

    /// Multiple strings.
    MultiString(Vec<String>),

    /// 64-bit integer.
    Qword(u64),
}

impl ValueData {
    /// Decodes value data based on the value type.
    ///
    /// # Arguments
    ///
    /// * `payload` - Raw payload bytes, already limited to the declared size
    ///   for variable-length types.
    /// * `value_type` - Type of the value.
    /// * `offset` - Offset of the payload for error reporting.
    ///
    /// # Errors
    ///
    /// Returns `Truncated` if a fixed-width integer does not fit in `payload`,
    /// `InvalidUtf16` for undecodable text and `UnsupportedType` for types
    /// with no decode rule.
    pub fn parse(payload: &[u8], value_type: ValueType, offset: usize) -> Result<Self> {
        // Integer reads are relative to the payload; report the payload offset.
        let truncated = |expected: usize| FormatError::truncated(offset, expected, payload.len());

        match value_type {
            ValueType::String => Ok(ValueData::String(read_utf16_string(payload, offset)?)),
            ValueType::ExpandString => Ok(ValueData::ExpandString(read_utf16_string(
                payload, offset,
            )?)),
            ValueType::Link => Ok(ValueData::Link(read_utf16_string(payload, offset)?)),

            ValueType::Binary => Ok(ValueData::Binary(payload.to_vec())),

            ValueType::Dword => {
                let value = read_u32_le(payload, 0).map_err(|_| truncated(4))?;
                Ok(ValueData::Dword(value))
            }

            ValueType::DwordBigEndian => {
                let value = read_u32_be(payload, 0).map_err(|_| truncated(4))?;
                Ok(ValueData::DwordBigEndian(value))
            }

            ValueType::Qword => {
                let value = read_u64_le(payload, 0).map_err(|_| truncated(8))?;
                Ok(ValueData::Qword(value))
            }

            ValueType::MultiString => {
                let joined = read_utf16_string(payload, offset)?;
                Ok(ValueData::MultiString(split_multi_string(&joined)))
            }

            ValueType::None
            | ValueType::ResourceList
            | ValueType::FullResourceDescriptor
            | ValueType::ResourceRequirementsList => {
                Err(FormatError::UnsupportedType { offset, value_type })
            }
        }
    }

    /// Returns the value type this data decodes from.
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueData::String(_) => ValueType::String,
            ValueData::ExpandString(_) => ValueType::ExpandString,
            ValueData::Binary(_) => ValueType::Binary,
            ValueData::Dword(_) => ValueType::Dword,
            ValueData::DwordBigEndian(_) => ValueType::DwordBigEndian,
            ValueData::Link(_) => ValueType::Link,
            ValueData::MultiString(_) => ValueType::MultiString,
            ValueData::Qword(_) => ValueType::Qword,
        }
    }

    /// Returns the string contents for string-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueData::String(s) | ValueData::ExpandString(s) | ValueData::Link(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer contents for DWORD and QWORD values.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ValueData::Dword(d) | ValueData::DwordBigEndian(d) => Some(u64::from(*d)),
            ValueData::Qword(q) => Some(*q),
            _ => None,
        }
    }
}

/// Splits decoded `REG_MULTI_SZ` text on its null separators.
///
/// Trailing terminators were already trimmed, so an empty payload (or one
/// holding only terminators) yields no strings. Interior empty strings are kept.
fn split_multi_string(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split('\0').map(str::to_string).collect()
}

impl fmt::Display for ValueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueData::String(s) | ValueData::ExpandString(s) | ValueData::Link(s) => {
                f.write_str(s)
            }
            ValueData::Binary(b) => f.write_str(&hex::encode_upper(b)),
            ValueData::Dword(d) | ValueData::DwordBigEndian(d) => write!(f, "{} (0x{:08X})", d, d),
            ValueData::Qword(q) => write!(f, "{} (0x{:016X})", q, q),
            ValueData::MultiString(strings) => f.write_str(&strings.join(", ")),
        }
    }
}
