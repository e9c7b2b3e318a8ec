//! Error types for registry policy parsing.
//!
//! Every variant is fatal to the decode call that produced it: the parser
//! never skips a malformed entry or returns a partially decoded policy.
//! Offsets are absolute byte positions in the buffer being decoded.

use crate::value::ValueType;
use std::io;
use thiserror::Error;

/// Result type alias for registry policy operations.
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors that can occur while decoding a registry policy file.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error occurred while reading the policy file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Buffer ends before a fixed-size field or a declared payload length.
    #[error("Truncated data at offset {offset:#x}: expected {expected} bytes, got {actual} bytes")]
    Truncated {
        /// Offset of the field that could not be read.
        offset: usize,
        /// Number of bytes the field requires.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },

    /// Header signature is not "PReg".
    #[error("Invalid signature: expected {expected:#010x}, found {found:#010x}")]
    BadSignature {
        /// Expected signature value.
        expected: u32,
        /// Signature read from the header.
        found: u32,
    },

    /// Header version is not supported.
    #[error("Unsupported policy version: expected {expected}, found {found}")]
    BadVersion {
        /// Expected version value.
        expected: u32,
        /// Version read from the header.
        found: u32,
    },

    /// Entry does not start with a wide `[`.
    #[error("Missing '[' at offset {offset:#x}")]
    MissingOpenBracket {
        /// Offset where the entry was expected to start.
        offset: usize,
    },

    /// Wide `]` is not where the declared size says the entry ends.
    #[error("Missing ']' at offset {offset:#x} (found {found:02X?})")]
    MissingCloseBracket {
        /// Offset computed from the field lengths and the declared size.
        offset: usize,
        /// The two bytes found there, if the buffer extends that far.
        found: Option<[u8; 2]>,
    },

    /// Entry does not contain the five `;`-separated fields.
    #[error("Malformed record at offset {offset:#x}: expected 5 fields, found {fields}")]
    MalformedRecord {
        /// Offset of the entry's opening bracket.
        offset: usize,
        /// Number of fields found before the data ran out.
        fields: usize,
    },

    /// Type code is not one of the defined registry value types.
    #[error("Unknown value type {code} at offset {offset:#x}")]
    UnknownType {
        /// Offset of the type field.
        offset: usize,
        /// Raw type code.
        code: u32,
    },

    /// Type is known but its payload has no decode rule.
    #[error("Unsupported value type {} at offset {offset:#x}", .value_type.name())]
    UnsupportedType {
        /// Offset of the type field.
        offset: usize,
        /// The value type that cannot be decoded.
        value_type: ValueType,
    },

    /// Invalid UTF-16 string data.
    #[error("Invalid UTF-16 string at offset {offset:#x}")]
    InvalidUtf16 {
        /// Offset of the string field.
        offset: usize,
    },
}

impl FormatError {
    /// Creates a truncation error with context.
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset of the field that could not be read
    /// * `expected` - Number of bytes required
    /// * `actual` - Number of bytes available
    pub fn truncated(offset: usize, expected: usize, actual: usize) -> Self {
        Self::Truncated {
            offset,
            expected,
            actual,
        }
    }

    /// Returns the byte offset the error refers to, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use reg_pol::error::FormatError;
    /// let err = FormatError::MissingOpenBracket { offset: 8 };
    /// assert_eq!(err.offset(), Some(8));
    /// ```
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Io(_) | Self::BadSignature { .. } | Self::BadVersion { .. } => None,
            Self::Truncated { offset, .. }
            | Self::MissingOpenBracket { offset }
            | Self::MissingCloseBracket { offset, .. }
            | Self::MalformedRecord { offset, .. }
            | Self::UnknownType { offset, .. }
            | Self::UnsupportedType { offset, .. }
            | Self::InvalidUtf16 { offset } => Some(*offset),
        }
    }
}
