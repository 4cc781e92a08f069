// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key tag derivation.
//
// The tag is the first two bytes of SHA-256(public key), big-endian. This is
// NOT the RFC 4034 Appendix B checksum over the DNSKEY RDATA. Key file names
// already on disk embed this value, so encoder and decoder must keep using it
// until both are migrated together.

use std::fmt;

use sha2::{Digest, Sha256};

/// 16-bit key identifier embedded in key file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyTag(u16);

impl KeyTag {
    /// Only for tags read back from file names; a key's own tag always comes
    /// from [`compute_key_tag`].
    pub(crate) fn from_embedded(value: u16) -> Self {
        Self(value)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<KeyTag> for u16 {
    fn from(tag: KeyTag) -> Self {
        tag.0
    }
}

/// Compute the key tag of a raw public key.
pub fn compute_key_tag(public_key: &[u8]) -> KeyTag {
    let digest = Sha256::digest(public_key);
    KeyTag(u16::from_be_bytes([digest[0], digest[1]]))
}
