// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! DNSSEC key material model.
//!
//! [`KeyMaterial`] is an immutable value: it is built once from provider
//! output (or from parsed key files) and exposes read-only accessors. The key
//! tag is computed in the constructor and cannot be set independently.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use hickory_proto::rr::Name;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::keytag::{compute_key_tag, KeyTag};

/// `YYYYMMDDhhmmss`, UTC.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const TIMESTAMP_LEN: usize = 14;

/// DNS name a key belongs to.
///
/// Stored lower-cased and without the trailing dot. [`Domain::fqdn`] renders
/// the dot-terminated owner name used in the DNSKEY record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.strip_suffix('.').unwrap_or(name);
        if trimmed.is_empty() {
            return Err(Error::input("domain", "must not be empty"));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || matches!(*c, '+' | '/' | '\\'))
        {
            return Err(Error::input(
                "domain",
                format!("{name:?} contains forbidden character {c:?}"),
            ));
        }
        if trimmed.split('.').any(str::is_empty) {
            return Err(Error::input(
                "domain",
                format!("{name:?} contains an empty label"),
            ));
        }
        Name::from_ascii(trimmed)
            .map_err(|e| Error::input("domain", format!("{name:?} is not a DNS name: {e}")))?;

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Name without the trailing dot, as used in key file names.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-terminated owner name.
    pub fn fqdn(&self) -> String {
        format!("{}.", self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// DNS protocol algorithm number, kept in the decimal width it was given in
/// (`031` stays `031`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmNumber {
    text: String,
    value: u8,
}

impl AlgorithmNumber {
    pub fn new(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::input("algorithm number", "must not be empty"));
        }
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::input(
                "algorithm number",
                format!("{text:?} is not a decimal number"),
            ));
        }
        let value = text.parse::<u8>().map_err(|_| {
            Error::input(
                "algorithm number",
                format!("{text:?} does not fit the 8-bit DNSKEY algorithm field"),
            )
        })?;

        Ok(Self {
            text: text.to_string(),
            value,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

impl fmt::Display for AlgorithmNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for AlgorithmNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Signing algorithm: the DNS number plus, when known, the provider name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Algorithm {
    number: AlgorithmNumber,
    name: Option<String>,
}

impl Algorithm {
    pub fn unnamed(number: AlgorithmNumber) -> Self {
        Self { number, name: None }
    }

    pub fn named(number: AlgorithmNumber, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::input("algorithm name", "must not be empty"));
        }
        Ok(Self {
            number,
            name: Some(name.to_string()),
        })
    }

    pub fn number(&self) -> &AlgorithmNumber {
        &self.number
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Second-resolution UTC timestamp rendered as `YYYYMMDDhhmmss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Sub-second precision is dropped; the file format cannot carry it.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(0))
    }

    pub fn parse(text: &str) -> Result<Self> {
        if text.len() != TIMESTAMP_LEN || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::input(
                "timestamp",
                format!("{text:?} is not in YYYYMMDDhhmmss form"),
            ));
        }
        let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .map_err(|e| Error::input("timestamp", format!("{text:?}: {e}")))?;
        Ok(Self(naive.and_utc()))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// Lifecycle timestamps written to the private key file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTiming {
    pub created: Timestamp,
    pub publish: Timestamp,
    pub activate: Timestamp,
}

impl KeyTiming {
    /// Created, published and activated at the same instant.
    pub fn uniform(at: Timestamp) -> Self {
        Self {
            created: at,
            publish: at,
            activate: at,
        }
    }
}

/// A DNSSEC key pair together with everything needed to write its key files.
#[derive(Clone)]
pub struct KeyMaterial {
    domain: Domain,
    algorithm: Algorithm,
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
    key_tag: KeyTag,
    timing: KeyTiming,
}

impl KeyMaterial {
    pub fn new(
        domain: Domain,
        algorithm: Algorithm,
        public_key: Vec<u8>,
        private_key: Vec<u8>,
        timing: KeyTiming,
    ) -> Result<Self> {
        let private_key = Zeroizing::new(private_key);
        if public_key.is_empty() {
            return Err(Error::input("public key", "must not be empty"));
        }
        if private_key.is_empty() {
            return Err(Error::input("private key", "must not be empty"));
        }

        let key_tag = compute_key_tag(&public_key);
        Ok(Self {
            domain,
            algorithm,
            public_key,
            private_key,
            key_tag,
            timing,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    pub fn algorithm_number(&self) -> &AlgorithmNumber {
        self.algorithm.number()
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn key_tag(&self) -> KeyTag {
        self.key_tag
    }

    pub fn timing(&self) -> &KeyTiming {
        &self.timing
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("domain", &self.domain)
            .field("algorithm", &self.algorithm)
            .field("key_tag", &self.key_tag)
            .field("public_key_len", &self.public_key.len())
            .field("private_key", &"<redacted>")
            .field("timing", &self.timing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> KeyTiming {
        KeyTiming::uniform(Timestamp::parse("20260101120000").unwrap())
    }

    fn algorithm() -> Algorithm {
        Algorithm::named(AlgorithmNumber::new("031").unwrap(), "Dilithium2").unwrap()
    }

    #[test]
    fn domain_is_normalized() {
        let a = Domain::new("Example.ORG.").unwrap();
        let b = Domain::new("example.org").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "example.org");
        assert_eq!(a.fqdn(), "example.org.");
    }

    #[test]
    fn domain_rejects_bad_names() {
        assert!(Domain::new("").is_err());
        assert!(Domain::new(".").is_err());
        assert!(Domain::new("exa mple.org").is_err());
        assert!(Domain::new("a+b.org").is_err());
        assert!(Domain::new("a/b.org").is_err());
        assert!(Domain::new("a\\.b.org").is_err());
        assert!(Domain::new("example.org..").is_err());
        assert!(Domain::new("a..b.org").is_err());
        assert!(Domain::new(".example.org").is_err());
        assert!(Domain::new(&format!("{}.org", "x".repeat(64))).is_err());
    }

    #[test]
    fn algorithm_number_keeps_width() {
        let n = AlgorithmNumber::new("031").unwrap();
        assert_eq!(n.as_str(), "031");
        assert_eq!(n.value(), 31);
        assert_eq!(n.to_string(), "031");
    }

    #[test]
    fn algorithm_number_validation() {
        assert!(matches!(
            AlgorithmNumber::new(""),
            Err(Error::Input { field: "algorithm number", .. })
        ));
        assert!(AlgorithmNumber::new("31a").is_err());
        assert!(AlgorithmNumber::new("-1").is_err());
        assert!(AlgorithmNumber::new("256").is_err());
        assert!(AlgorithmNumber::new("255").is_ok());
    }

    #[test]
    fn algorithm_name_must_not_be_empty() {
        let n = AlgorithmNumber::new("17").unwrap();
        assert!(Algorithm::named(n.clone(), "").is_err());
        assert_eq!(Algorithm::unnamed(n).name(), None);
    }

    #[test]
    fn timestamp_format() {
        let ts = Timestamp::parse("20260314092653").unwrap();
        assert_eq!(ts.to_string(), "20260314092653");
        assert!(Timestamp::parse("2026031409265").is_err());
        assert!(Timestamp::parse("20261314092653").is_err());
        assert!(Timestamp::parse("2026-03-14T09:2").is_err());
    }

    #[test]
    fn timestamp_drops_subseconds() {
        let now = Timestamp::now();
        assert_eq!(Timestamp::parse(&now.to_string()).unwrap(), now);
    }

    #[test]
    fn key_tag_is_derived_from_public_key() {
        let key = KeyMaterial::new(
            Domain::new("example.org").unwrap(),
            algorithm(),
            vec![1, 2, 3],
            vec![9; 16],
            timing(),
        )
        .unwrap();
        assert_eq!(key.key_tag(), compute_key_tag(&[1, 2, 3]));
    }

    #[test]
    fn key_tag_ignores_domain_and_algorithm() {
        let a = KeyMaterial::new(
            Domain::new("example.org").unwrap(),
            algorithm(),
            vec![7; 32],
            vec![1],
            timing(),
        )
        .unwrap();
        let b = KeyMaterial::new(
            Domain::new("other.example.net").unwrap(),
            Algorithm::unnamed(AlgorithmNumber::new("17").unwrap()),
            vec![7; 32],
            vec![2],
            timing(),
        )
        .unwrap();
        assert_eq!(a.key_tag(), b.key_tag());
    }

    #[test]
    fn empty_keys_are_rejected() {
        let domain = Domain::new("example.org").unwrap();
        let err = KeyMaterial::new(domain.clone(), algorithm(), vec![], vec![1], timing())
            .unwrap_err();
        assert!(matches!(err, Error::Input { field: "public key", .. }));

        let err = KeyMaterial::new(domain, algorithm(), vec![1], vec![], timing()).unwrap_err();
        assert!(matches!(err, Error::Input { field: "private key", .. }));
    }

    #[test]
    fn debug_redacts_private_key() {
        let key = KeyMaterial::new(
            Domain::new("example.org").unwrap(),
            algorithm(),
            vec![1, 2, 3],
            b"top secret bytes".to_vec(),
            timing(),
        )
        .unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("116, 111, 112"));
    }
}
