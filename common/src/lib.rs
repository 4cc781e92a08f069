// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pqdnssec common: post-quantum DNSSEC key material in BIND key file form
//
//   Key tag:   SHA-256(public key)[0..2], big-endian
//   Records:   `.key` DNSKEY record (flags 257, protocol 3)
//              `.private` Private-key-format v1.3
//   Names:     K<domain>+<algorithm>+<keytag>.{key,private}
//   Providers: ML-DSA / Dilithium (FIPS 204), SLH-DSA / SPHINCS+ (FIPS 205)

pub mod error;
pub mod key;
pub mod keytag;
pub mod naming;
pub mod provider;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use key::{Algorithm, AlgorithmNumber, Domain, KeyMaterial, KeyTiming, Timestamp};
pub use keytag::{compute_key_tag, KeyTag};
pub use naming::{key_file_name, parse_key_file_name, KeyFileKind, KeyFileName, KeyFileNames};
pub use provider::{
    generate_key_material, FixedProvider, KeyMaterialProvider, PqcryptoProvider, ProviderError,
    RawKeyPair,
};
pub use record::{
    encode_private_record, encode_public_record, load_key_files, parse_key_files,
    parse_key_records,
};
pub use store::{write_key_files, KeyFilePaths};
