// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema fingerprint accumulator.
//!
//! Every property descriptor appends its canonical field bytes while it is
//! constructed. Once a schema load is complete the loader finalizes the
//! accumulator into a [`SchemaDigest`], an MD5 over the concatenation of
//! everything appended, in append order. Two processes that load the same
//! schema produce the same digest.
//!
//! # Example
//!
//! ```
//! use entity_schema::SchemaFingerprint;
//!
//! let mut fp = SchemaFingerprint::new();
//! fp.append(b"position");
//! let digest = fp.finalize();
//! assert_eq!(digest.as_bytes().len(), 16);
//! ```

use md5::{Digest, Md5};
use std::fmt;

/// Running MD5 over canonical schema bytes.
///
/// Lifecycle is `new → append* → finalize`; `finalize` consumes the
/// accumulator so a finished load cannot be extended.
#[derive(Clone, Default)]
pub struct SchemaFingerprint {
    hasher: Md5,
    bytes_appended: u64,
    property_count: u32,
}

impl SchemaFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes.
    pub fn append(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.bytes_appended += bytes.len() as u64;
    }

    pub(crate) fn record_property(&mut self) {
        self.property_count += 1;
    }

    /// Descriptors constructed against this accumulator.
    pub fn property_count(&self) -> u32 {
        self.property_count
    }

    pub fn bytes_appended(&self) -> u64 {
        self.bytes_appended
    }

    /// Produce the digest.
    pub fn finalize(self) -> SchemaDigest {
        let result = self.hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&result);
        SchemaDigest(bytes)
    }
}

impl fmt::Debug for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaFingerprint")
            .field("bytes_appended", &self.bytes_appended)
            .field("property_count", &self.property_count)
            .finish_non_exhaustive()
    }
}

/// 16-byte schema digest, compared across processes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaDigest([u8; 16]);

impl SchemaDigest {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex, 32 chars.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for SchemaDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaDigest({})", self)
    }
}

impl fmt::Display for SchemaDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; 16]> for SchemaDigest {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for SchemaDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
