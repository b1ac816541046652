//! BLAKE3 directory fingerprints.
//!
//! # Overview
//!
//! A fingerprint summarizes the recursive *structure* of a directory: its
//! sorted entry names followed by the fingerprints of its subdirectories,
//! fed in the same sorted-name order. Paths, timestamps and file contents
//! never contribute.
//!
//! Fingerprints are a cheap grouping key. Two directories with equal
//! fingerprints are only reported as duplicates after a structural
//! comparison (see [`DirectoryTree::structurally_equal`]).
//!
//! [`DirectoryTree::structurally_equal`]: super::DirectoryTree::structurally_equal

use std::ffi::OsStr;

/// Fingerprint type (32-byte BLAKE3 digest).
pub type Fingerprint = [u8; 32];

/// Compute the fingerprint of a directory.
///
/// # Arguments
///
/// * `entries` - Immediate child names, already sorted and filtered
/// * `children` - Fingerprints of the subdirectories, in the same order as
///   their names appear in `entries`
///
/// Entry names are length-prefixed so that `["ab"]` and `["a", "b"]` can
/// never produce the same byte stream.
///
/// # Example
///
/// ```
/// use dirdupe::scanner::hasher::fingerprint;
/// use std::ffi::OsString;
///
/// let entries = vec![OsString::from("a.txt"), OsString::from("sub")];
/// let leaf = fingerprint(&[] as &[OsString], std::iter::empty());
/// let fp1 = fingerprint(&entries, [&leaf]);
/// let fp2 = fingerprint(&entries, [&leaf]);
/// assert_eq!(fp1, fp2);
/// ```
#[must_use]
pub fn fingerprint<'a, S, I>(entries: &[S], children: I) -> Fingerprint
where
    S: AsRef<OsStr>,
    I: IntoIterator<Item = &'a Fingerprint>,
{
    let mut hasher = blake3::Hasher::new();

    hasher.update(&(entries.len() as u64).to_le_bytes());
    for entry in entries {
        let bytes = entry.as_ref().as_encoded_bytes();
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }

    let mut child_count: u64 = 0;
    let mut child_hasher = blake3::Hasher::new();
    for child in children {
        child_hasher.update(child);
        child_count += 1;
    }
    hasher.update(&child_count.to_le_bytes());
    hasher.update(child_hasher.finalize().as_bytes());

    *hasher.finalize().as_bytes()
}

/// Convert a fingerprint to its hexadecimal representation.
///
/// # Example
///
/// ```
/// use dirdupe::scanner::hasher::fingerprint_to_hex;
///
/// let hex = fingerprint_to_hex(&[0u8; 32]);
/// assert_eq!(hex.len(), 64);
/// assert!(hex.chars().all(|c| c == '0'));
/// ```
#[must_use]
pub fn fingerprint_to_hex(fp: &Fingerprint) -> String {
    blake3::Hash::from(*fp).to_hex().to_string()
}
