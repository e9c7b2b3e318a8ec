//! Top-level registry policy decoder with memory-mapped file support.

use crate::entry::Entry;
use crate::error::Result;
use crate::header::{PolicyHeader, HEADER_SIZE};
use memmap2::Mmap;
use std::fs::File;
use std::iter::FusedIterator;
use std::path::Path;
use std::slice;
use tracing::{debug, info, instrument};

/// A decoded registry policy file.
///
/// Holds the validated header fields and every entry in file order. A policy
/// is only produced by a complete, successful decode and is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Policy {
    header: PolicyHeader,
    entries: Vec<Entry>,
}

impl Policy {
    /// Opens and decodes a registry policy file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the policy file (usually `Registry.pol`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be opened or mapped
    /// - Header is not a valid policy header
    /// - Any entry is malformed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use reg_pol::Policy;
    ///
    /// let policy = Policy::open("Registry.pol").unwrap();
    /// println!("Policy loaded with {} entries", policy.len());
    /// ```
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening registry policy");
        let file = File::open(&path)?;

        let file_size = file.metadata()?.len();
        debug!(size = file_size, "File opened successfully");

        // Zero-length files cannot be mapped on every platform
        if file_size == 0 {
            return Self::parse(&[]);
        }

        // SAFETY: This is safe because:
        // 1. The file is opened in read-only mode (no write access)
        // 2. The map only lives for the duration of this call
        // 3. All access to the map goes through bounds-checked slicing
        // 4. Decoded entries own their data and never borrow from the map
        let mmap = unsafe { Mmap::map(&file)? };

        let policy = Self::parse(&mmap)?;
        debug!(entries = policy.len(), "Decoded registry policy");
        Ok(policy)
    }

    /// Decodes a policy from owned data.
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        Self::parse(&data)
    }

    /// Decodes a policy from a byte buffer.
    ///
    /// The header is validated first, then entries are decoded back-to-back
    /// until the buffer is exhausted. The first error aborts the decode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use reg_pol::Policy;
    ///
    /// let policy = Policy::parse(b"PReg\x01\x00\x00\x00").unwrap();
    /// assert!(policy.is_empty());
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        let entries = EntryIterator::new(data)?;
        let header = entries.header();
        let entries = entries.collect::<Result<Vec<_>>>()?;

        Ok(Self { header, entries })
    }

    /// Returns the validated header.
    pub fn header(&self) -> &PolicyHeader {
        &self.header
    }

    /// Returns the header signature.
    pub fn signature(&self) -> u32 {
        self.header.signature
    }

    /// Returns the header version.
    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Returns all entries in file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the policy holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Iterates over entries in file order.
    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Consumes the policy, returning its entries.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Serializes the policy to a JSON string.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a Policy {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Policy {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Incremental decoder over the entries of a policy buffer.
///
/// Each entry's start is only known once the previous one is decoded, so
/// entries are produced strictly in file order. After the first error the
/// iterator yields nothing more.
#[derive(Debug, Clone)]
pub struct EntryIterator<'a> {
    data: &'a [u8],
    header: PolicyHeader,
    offset: usize,
    failed: bool,
}

impl<'a> EntryIterator<'a> {
    /// Validates the header and positions the iterator at the first entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is invalid.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let header = PolicyHeader::parse(data)?;
        Ok(Self {
            data,
            header,
            offset: HEADER_SIZE,
            failed: false,
        })
    }

    /// Returns the validated header.
    pub fn header(&self) -> PolicyHeader {
        self.header
    }

    /// Returns the offset of the next entry.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for EntryIterator<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match Entry::parse(self.data, self.offset) {
            Ok((entry, consumed)) => {
                self.offset += consumed;
                Some(Ok(entry))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for EntryIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::header::{POLICY_SIGNATURE, POLICY_VERSION};
    use crate::test_support::{policy, record, string_record, wide};
    use crate::value::{ValueData, ValueType};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reg_pol_{}_{}.pol", std::process::id(), name))
    }

    #[test]
    fn test_header_only() {
        let parsed = Policy::parse(&policy(&[])).unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.len(), 0);
        assert_eq!(parsed.signature(), POLICY_SIGNATURE);
        assert_eq!(parsed.version(), POLICY_VERSION);
    }

    #[test]
    fn test_entries_in_file_order() {
        let bytes = policy(&[
            string_record("K1", "V1", "first"),
            record("K2", "V2", 4, 4, &7u32.to_le_bytes()),
            string_record("K3", "V3", "third"),
        ]);
        let parsed = Policy::parse(&bytes).unwrap();

        assert_eq!(parsed.len(), 3);
        let keys: Vec<&str> = parsed.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["K1", "K2", "K3"]);
        assert_eq!(parsed.get(1).unwrap().data, ValueData::Dword(7));
        assert_eq!(parsed.entries()[2].value_type, ValueType::String);
        assert!(parsed.get(3).is_none());
    }

    #[test]
    fn test_first_error_aborts() {
        let mut bytes = policy(&[string_record("K1", "V1", "ok")]);
        bytes.extend(wide("junk"));
        bytes.extend(string_record("K2", "V2", "never"));

        let err = Policy::parse(&bytes).unwrap_err();
        assert!(matches!(err, FormatError::MissingOpenBracket { .. }));
    }

    #[test]
    fn test_trailing_partial_entry() {
        let mut bytes = policy(&[string_record("K", "V", "x")]);
        bytes.push(0x5B);
        assert!(matches!(
            Policy::parse(&bytes),
            Err(FormatError::MissingOpenBracket { .. })
        ));
    }

    #[test]
    fn test_bad_header_propagates() {
        let mut bytes = policy(&[string_record("K", "V", "x")]);
        bytes[4] = 2;
        assert!(matches!(
            Policy::parse(&bytes),
            Err(FormatError::BadVersion { found: 2, .. })
        ));
        assert!(matches!(
            Policy::parse(&bytes[..5]),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn test_entry_iterator_stops_after_error() {
        let mut bytes = policy(&[string_record("K", "V", "x")]);
        let first_len = bytes.len();
        bytes.extend(wide("bad"));

        let mut entries = EntryIterator::new(&bytes).unwrap();
        assert_eq!(entries.offset(), HEADER_SIZE);
        assert!(entries.next().unwrap().is_ok());
        assert_eq!(entries.offset(), first_len);
        assert!(entries.next().unwrap().is_err());
        assert!(entries.next().is_none());
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_into_iterator() {
        let bytes = policy(&[string_record("A", "B", "C"), string_record("D", "E", "F")]);
        let parsed = Policy::parse(&bytes).unwrap();

        let mut count = 0;
        for entry in &parsed {
            assert!(!entry.key.is_empty());
            count += 1;
        }
        assert_eq!(count, 2);

        let owned: Vec<Entry> = parsed.clone().into_iter().collect();
        assert_eq!(owned, parsed.into_entries());
    }

    #[test]
    fn test_open_file() {
        let path = temp_path("open");
        std::fs::write(&path, policy(&[string_record("A", "B", "C")])).unwrap();

        let result = Policy::open(&path);
        std::fs::remove_file(&path).unwrap();

        let parsed = result.unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.entries()[0].data, ValueData::String("C".to_string()));
    }

    #[test]
    fn test_open_empty_file() {
        let path = temp_path("empty");
        std::fs::write(&path, b"").unwrap();

        let result = Policy::open(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(FormatError::Truncated {
                expected: 8,
                actual: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = Policy::open(temp_path("does_not_exist"));
        assert!(matches!(result, Err(FormatError::Io(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_to_json() {
        let parsed = Policy::parse(&policy(&[string_record("A", "B", "C")])).unwrap();
        let json = parsed.to_json().unwrap();
        assert!(json.contains("\"key\":\"A\""));
        assert!(json.contains("\"signature\":1734693456"));
    }
}
