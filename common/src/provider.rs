// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! Post-quantum key material providers.
//!
//! A provider lists the signature algorithms it knows about, the subset that
//! is usable in this build, and generates raw key pairs by algorithm name.
//! Nothing else in the crate inspects algorithm names; the encoder and parser
//! only see the bytes a provider returns.
//!
//! [`PqcryptoProvider`] is backed by the `pqcrypto` crates:
//!   - ML-DSA / Dilithium (FIPS 204), cargo feature `dilithium`
//!   - SLH-DSA / SPHINCS+ (FIPS 205), cargo feature `sphincsplus`
//!
//! [`FixedProvider`] hands out preconfigured bytes and exists for tests.

use std::mem;

#[cfg(any(feature = "dilithium", feature = "sphincsplus"))]
use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};
use tracing::info;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::key::{Algorithm, AlgorithmNumber, Domain, KeyMaterial, KeyTiming};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("signature algorithm name must not be empty")]
    EmptyName,

    #[error("unknown signature algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("signature algorithm {0:?} is supported but not enabled in this build")]
    AlgorithmDisabled(String),
}

/// Raw key pair bytes as produced by a provider.
pub struct RawKeyPair {
    pub public_key: Vec<u8>,
    pub private_key: Zeroizing<Vec<u8>>,
}

impl RawKeyPair {
    pub fn new(public_key: Vec<u8>, private_key: Vec<u8>) -> Self {
        Self {
            public_key,
            private_key: Zeroizing::new(private_key),
        }
    }
}

pub trait KeyMaterialProvider {
    /// Every algorithm name the provider recognises.
    fn supported_algorithms(&self) -> Vec<&str>;

    /// Algorithms usable right now; always a subset of the supported ones.
    fn enabled_algorithms(&self) -> Vec<&str>;

    fn generate_keypair(&self, algorithm: &str) -> std::result::Result<RawKeyPair, ProviderError>;
}

/// Generate a key pair with `provider` and wrap it as [`KeyMaterial`].
pub fn generate_key_material(
    provider: &dyn KeyMaterialProvider,
    algorithm_name: &str,
    number: AlgorithmNumber,
    domain: Domain,
    timing: KeyTiming,
) -> Result<KeyMaterial> {
    let algorithm = Algorithm::named(number, algorithm_name)?;
    let mut pair = provider.generate_keypair(algorithm_name)?;
    let private_key = mem::take(&mut *pair.private_key);

    KeyMaterial::new(domain, algorithm, pair.public_key, private_key, timing)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Dilithium,
    SphincsPlus,
}

impl Family {
    fn enabled(self) -> bool {
        match self {
            Self::Dilithium => cfg!(feature = "dilithium"),
            Self::SphincsPlus => cfg!(feature = "sphincsplus"),
        }
    }
}

/// Names follow liboqs so keys can be cross-checked against its tooling.
const ALGORITHMS: &[(&str, Family)] = &[
    ("Dilithium2", Family::Dilithium),
    ("Dilithium3", Family::Dilithium),
    ("Dilithium5", Family::Dilithium),
    ("SPHINCS+-SHA2-128f-simple", Family::SphincsPlus),
    ("SPHINCS+-SHA2-128s-simple", Family::SphincsPlus),
    ("SPHINCS+-SHA2-256s-simple", Family::SphincsPlus),
];

#[cfg(any(feature = "dilithium", feature = "sphincsplus"))]
macro_rules! keypair_of {
    ($($alg:ident)::+) => {{
        let (pk, sk) = $($alg)::+::keypair();
        RawKeyPair::new(pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
    }};
}

/// Key pairs from the `pqcrypto` post-quantum signature implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PqcryptoProvider;

impl PqcryptoProvider {
    pub fn new() -> Self {
        Self
    }

    fn keypair(name: &str) -> Option<RawKeyPair> {
        match name {
            #[cfg(feature = "dilithium")]
            "Dilithium2" => Some(keypair_of!(pqcrypto_dilithium::dilithium2)),
            #[cfg(feature = "dilithium")]
            "Dilithium3" => Some(keypair_of!(pqcrypto_dilithium::dilithium3)),
            #[cfg(feature = "dilithium")]
            "Dilithium5" => Some(keypair_of!(pqcrypto_dilithium::dilithium5)),
            #[cfg(feature = "sphincsplus")]
            "SPHINCS+-SHA2-128f-simple" => {
                Some(keypair_of!(pqcrypto_sphincsplus::sphincssha2128fsimple))
            }
            #[cfg(feature = "sphincsplus")]
            "SPHINCS+-SHA2-128s-simple" => {
                Some(keypair_of!(pqcrypto_sphincsplus::sphincssha2128ssimple))
            }
            #[cfg(feature = "sphincsplus")]
            "SPHINCS+-SHA2-256s-simple" => {
                Some(keypair_of!(pqcrypto_sphincsplus::sphincssha2256ssimple))
            }
            _ => None,
        }
    }
}

impl KeyMaterialProvider for PqcryptoProvider {
    fn supported_algorithms(&self) -> Vec<&str> {
        ALGORITHMS.iter().map(|(name, _)| *name).collect()
    }

    fn enabled_algorithms(&self) -> Vec<&str> {
        ALGORITHMS
            .iter()
            .filter(|(_, family)| family.enabled())
            .map(|(name, _)| *name)
            .collect()
    }

    fn generate_keypair(&self, algorithm: &str) -> std::result::Result<RawKeyPair, ProviderError> {
        if algorithm.is_empty() {
            return Err(ProviderError::EmptyName);
        }
        let (name, family) = ALGORITHMS
            .iter()
            .find(|(name, _)| *name == algorithm)
            .ok_or_else(|| ProviderError::UnknownAlgorithm(algorithm.to_string()))?;
        if !family.enabled() {
            return Err(ProviderError::AlgorithmDisabled(algorithm.to_string()));
        }

        let pair = Self::keypair(name)
            .ok_or_else(|| ProviderError::AlgorithmDisabled(algorithm.to_string()))?;
        info!(
            algorithm = %name,
            pk_len = pair.public_key.len(),
            sk_len = pair.private_key.len(),
            "generated key pair"
        );
        Ok(pair)
    }
}

#[derive(Clone)]
struct FixedEntry {
    name: String,
    enabled: bool,
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
}

/// Provider returning fixed byte sequences, for exercising the encoder,
/// parser and store without running a real key generator.
#[derive(Clone, Default)]
pub struct FixedProvider {
    entries: Vec<FixedEntry>,
}

impl FixedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enabled algorithm that always yields these bytes.
    pub fn with_algorithm(mut self, name: &str, public_key: &[u8], private_key: &[u8]) -> Self {
        self.entries.push(FixedEntry {
            name: name.to_string(),
            enabled: true,
            public_key: public_key.to_vec(),
            private_key: Zeroizing::new(private_key.to_vec()),
        });
        self
    }

    /// Register an algorithm that is supported but not enabled.
    pub fn with_disabled_algorithm(mut self, name: &str) -> Self {
        self.entries.push(FixedEntry {
            name: name.to_string(),
            enabled: false,
            public_key: Vec::new(),
            private_key: Zeroizing::new(Vec::new()),
        });
        self
    }
}

impl KeyMaterialProvider for FixedProvider {
    fn supported_algorithms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn enabled_algorithms(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.name.as_str())
            .collect()
    }

    fn generate_keypair(&self, algorithm: &str) -> std::result::Result<RawKeyPair, ProviderError> {
        if algorithm.is_empty() {
            return Err(ProviderError::EmptyName);
        }
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == algorithm)
            .ok_or_else(|| ProviderError::UnknownAlgorithm(algorithm.to_string()))?;
        if !entry.enabled {
            return Err(ProviderError::AlgorithmDisabled(algorithm.to_string()));
        }
        Ok(RawKeyPair::new(
            entry.public_key.clone(),
            entry.private_key.to_vec(),
        ))
    }
}
