// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key file naming: K<domain>+<algorithm>+<keytag>.key / .private
//
// The key tag is decimal without zero padding. Both names of one key are
// produced together and differ only in their extension.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::key::{AlgorithmNumber, Domain, KeyMaterial};
use crate::keytag::KeyTag;

const FIELD_FILE_NAME: &str = "file name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFileKind {
    Public,
    Private,
}

impl KeyFileKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Public => "key",
            Self::Private => "private",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "key" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

impl fmt::Display for KeyFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Private => f.write_str("private"),
        }
    }
}

/// Canonical file name for one half of a key pair.
pub fn key_file_name(
    domain: &Domain,
    algorithm: &AlgorithmNumber,
    key_tag: KeyTag,
    kind: KeyFileKind,
) -> String {
    format!("K{domain}+{algorithm}+{key_tag}.{}", kind.extension())
}

/// The paired `.key` / `.private` names of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFileNames {
    pub public: String,
    pub private: String,
}

impl KeyFileNames {
    pub fn for_key(key: &KeyMaterial) -> Self {
        let name = |kind| key_file_name(key.domain(), key.algorithm_number(), key.key_tag(), kind);
        Self {
            public: name(KeyFileKind::Public),
            private: name(KeyFileKind::Private),
        }
    }
}

/// Components recovered from a key file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFileName {
    pub domain: Domain,
    pub algorithm: AlgorithmNumber,
    pub key_tag: KeyTag,
    pub kind: KeyFileKind,
}

impl KeyFileName {
    /// Whether `key` is the key this name was generated for, using the key's
    /// recomputed tag.
    pub fn matches(&self, key: &KeyMaterial) -> bool {
        self.domain == *key.domain()
            && self.algorithm.value() == key.algorithm_number().value()
            && self.key_tag == key.key_tag()
    }
}

/// Split a key file name (directory components are ignored) into its parts.
pub fn parse_key_file_name(path: impl AsRef<Path>) -> Result<KeyFileName> {
    let path = path.as_ref();
    let invalid = |reason: &str| Error::format(path, FIELD_FILE_NAME, reason);

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| invalid("not a UTF-8 file name"))?;
    let name = name
        .strip_prefix('K')
        .ok_or_else(|| invalid("does not start with `K`"))?;
    let (stem, ext) = name
        .rsplit_once('.')
        .ok_or_else(|| invalid("has no extension"))?;
    let kind = KeyFileKind::from_extension(ext)
        .ok_or_else(|| invalid("extension is neither `.key` nor `.private`"))?;

    let mut parts = stem.rsplitn(3, '+');
    let (Some(tag), Some(algorithm), Some(domain)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid("expected K<domain>+<algorithm>+<keytag>"));
    };

    let key_tag = tag
        .parse::<u16>()
        .map(KeyTag::from_embedded)
        .map_err(|_| invalid("key tag is not a 16-bit decimal number"))?;
    let algorithm = AlgorithmNumber::new(algorithm).map_err(|e| invalid(&e.to_string()))?;
    let domain = Domain::new(domain).map_err(|e| invalid(&e.to_string()))?;

    Ok(KeyFileName {
        domain,
        algorithm,
        key_tag,
        kind,
    })
}
