//! Registry policy header parsing.
//!
//! A policy file starts with an 8-byte header: the "PReg" signature and the
//! format version, both little-endian 32-bit integers.

use crate::error::{FormatError, Result};
use crate::utils::read_u32_le;
use std::fmt;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Expected signature ("PReg" read as a little-endian u32).
pub const POLICY_SIGNATURE: u32 = 0x6765_5250;

/// The only defined format version.
pub const POLICY_VERSION: u32 = 1;

/// Registry policy file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolicyHeader {
    /// Signature, always [`POLICY_SIGNATURE`] once validated.
    pub signature: u32,

    /// Format version, always [`POLICY_VERSION`] once validated.
    pub version: u32,
}

impl PolicyHeader {
    /// Parses and validates a header from the start of a buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Data is shorter than [`HEADER_SIZE`]
    /// - Signature is not "PReg"
    /// - Version is not 1
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::truncated(0, HEADER_SIZE, data.len()));
        }

        let signature = read_u32_le(data, 0)?;
        if signature != POLICY_SIGNATURE {
            return Err(FormatError::BadSignature {
                expected: POLICY_SIGNATURE,
                found: signature,
            });
        }

        let version = read_u32_le(data, 4)?;
        if version != POLICY_VERSION {
            return Err(FormatError::BadVersion {
                expected: POLICY_VERSION,
                found: version,
            });
        }

        Ok(PolicyHeader { signature, version })
    }
}

impl fmt::Display for PolicyHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registry Policy Header:\n\
             - Signature: {:#010x}\n\
             - Version: {}",
            self.signature, self.version
        )
    }
}
