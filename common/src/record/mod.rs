// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// BIND-style key records.
//
// Public record (`.key`):
//   ; This is a DNSKEY record
//   <domain>. IN DNSKEY 257 3 <algorithm> <base64 public key>
//
// Private record (`.private`):
//   Private-key-format: v1.3
//   Algorithm: <algorithm>
//   Created: <YYYYMMDDhhmmss>
//   Publish: <YYYYMMDDhhmmss>
//   Activate: <YYYYMMDDhhmmss>
//   PrivateKey: <base64 private key>

pub mod encode;
pub mod parse;

pub use encode::{encode_private_record, encode_public_record};
pub use parse::{load_key_files, parse_key_files, parse_key_records};

/// Comment line opening every public record.
pub const PUBLIC_RECORD_COMMENT: &str = "; This is a DNSKEY record";
/// DNSKEY flags: Zone Key + Secure Entry Point (KSK).
pub const DNSKEY_FLAGS: u16 = 257;
/// DNSKEY protocol field, always 3 (RFC 4034 Section 2.1.2).
pub const DNSKEY_PROTOCOL: u8 = 3;
/// Private-key-format version written by the encoder.
pub const PRIVATE_KEY_FORMAT: &str = "v1.3";

pub(crate) const FIELD_FORMAT: &str = "Private-key-format";
pub(crate) const FIELD_ALGORITHM: &str = "Algorithm";
pub(crate) const FIELD_CREATED: &str = "Created";
pub(crate) const FIELD_PUBLISH: &str = "Publish";
pub(crate) const FIELD_ACTIVATE: &str = "Activate";
pub(crate) const FIELD_PRIVATE_KEY: &str = "PrivateKey";
