//! # Windows Registry Policy Parser
//!
//! A decoder for Group Policy registry policy files (`Registry.pol`).
//!
//! ## Features
//!
//! - **Strict framing**: Every entry's declared size is cross-checked against its closing bracket
//! - **Type-safe**: Payloads decode into a [`ValueData`] variant matching the entry's [`ValueType`]
//! - **Fail fast**: The first malformed byte aborts the decode with a precise [`FormatError`]
//! - **Memory-mapped I/O**: [`Policy::open`] maps the file read-only
//!
//! ## Binary Layout
//!
//! All integers are little-endian; text, brackets and separators are UTF-16LE.
//!
//! ```text
//! [Header - 8 bytes]
//!   - Signature: "PReg" (0x67655250)
//!   - Version: 1
//!
//! [Entries - back-to-back until end of file]
//!   "[" key ";" value ";" type(u32) ";" size(u32) ";" data "]"
//! ```
//!
//! ## Examples
//!
//! ### Basic Usage
//!
//! ```no_run
//! use reg_pol::Policy;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = Policy::open("Registry.pol")?;
//!
//! println!("Policy loaded with {} entries:", policy.len());
//! for entry in &policy {
//!     println!("{} \\ {} = {}", entry.key, entry.value, entry.data);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Matching on Value Data
//!
//! ```no_run
//! use reg_pol::{Policy, ValueData};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("Registry.pol")?;
//! let policy = Policy::parse(&bytes)?;
//!
//! for entry in policy.iter().filter(|e| e.key.starts_with("Software\\Policies")) {
//!     match &entry.data {
//!         ValueData::String(s) => println!("{} = {:?}", entry.value, s),
//!         ValueData::Dword(d) => println!("{} = {}", entry.value, d),
//!         other => println!("{} = {}", entry.value, other),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Value Types
//!
//! REG_SZ, REG_EXPAND_SZ, REG_LINK, REG_BINARY, REG_DWORD, REG_DWORD_BIG_ENDIAN,
//! REG_MULTI_SZ and REG_QWORD. REG_NONE and the resource list types are
//! recognized but rejected with [`FormatError::UnsupportedType`].
//!
//! Writing policy files is not supported.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod header;
pub mod policy;
pub mod utils;
pub mod value;

// Python bindings (only compiled when python feature is enabled)
#[cfg(feature = "python")]
pub mod python;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use entry::Entry;
pub use error::{FormatError, Result};
pub use header::PolicyHeader;
pub use policy::{EntryIterator, Policy};
pub use value::{ValueData, ValueType};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
