// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
//! Key record decoding.
//!
//! Accepts the records produced by [`super::encode`] and the common BIND
//! variations of them: extra `;` comment lines and an optional TTL in the
//! public record, extra fields and a parenthesized algorithm mnemonic in the
//! private record. The key tag is always recomputed from the decoded public
//! key; nothing in a file name is trusted.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use super::{
    DNSKEY_PROTOCOL, FIELD_ACTIVATE, FIELD_ALGORITHM, FIELD_CREATED, FIELD_FORMAT,
    FIELD_PRIVATE_KEY, FIELD_PUBLISH,
};
use crate::error::{Error, Result};
use crate::key::{Algorithm, AlgorithmNumber, Domain, KeyMaterial, KeyTiming, Timestamp};

/// Origin reported in errors for in-memory public records.
pub const PUBLIC_RECORD_ORIGIN: &str = "<public record>";
/// Origin reported in errors for in-memory private records.
pub const PRIVATE_RECORD_ORIGIN: &str = "<private record>";

/// Parse a key pair from the contents of its `.key` and `.private` files.
pub fn parse_key_records(public: &str, private: &str) -> Result<KeyMaterial> {
    decode(
        Path::new(PUBLIC_RECORD_ORIGIN),
        public,
        Path::new(PRIVATE_RECORD_ORIGIN),
        private,
    )
}

/// Read and parse a `.key` / `.private` file pair.
pub fn parse_key_files(
    public_path: impl AsRef<Path>,
    private_path: impl AsRef<Path>,
) -> Result<KeyMaterial> {
    let public_path = public_path.as_ref();
    let private_path = private_path.as_ref();
    debug!(
        public = %public_path.display(),
        private = %private_path.display(),
        "parsing key files"
    );

    let public = fs::read_to_string(public_path).map_err(|e| Error::io(public_path, e))?;
    let private = fs::read_to_string(private_path).map_err(|e| Error::io(private_path, e))?;

    decode(public_path, &public, private_path, &private)
}

/// Async variant of [`parse_key_files`]; both files are read concurrently.
pub async fn load_key_files(
    public_path: impl AsRef<Path>,
    private_path: impl AsRef<Path>,
) -> Result<KeyMaterial> {
    let public_path = public_path.as_ref();
    let private_path = private_path.as_ref();
    debug!(
        public = %public_path.display(),
        private = %private_path.display(),
        "loading key files"
    );

    let (public, private) = tokio::try_join!(read_text(public_path), read_text(private_path))?;

    decode(public_path, &public, private_path, &private)
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))
}

fn decode(
    public_file: &Path,
    public: &str,
    private_file: &Path,
    private: &str,
) -> Result<KeyMaterial> {
    let dnskey = parse_public_record(public_file, public)?;
    let fields = parse_private_record(private_file, private)?;

    if fields.algorithm.value() != dnskey.algorithm.value() {
        return Err(Error::format(
            private_file,
            FIELD_ALGORITHM,
            format!(
                "algorithm {} does not match DNSKEY algorithm {} in {}",
                fields.algorithm,
                dnskey.algorithm,
                public_file.display()
            ),
        ));
    }

    let algorithm = match fields.algorithm_name {
        Some(name) => Algorithm::named(dnskey.algorithm, &name)?,
        None => Algorithm::unnamed(dnskey.algorithm),
    };

    KeyMaterial::new(
        dnskey.domain,
        algorithm,
        dnskey.public_key,
        fields.private_key,
        fields.timing,
    )
}

struct DnskeyRecord {
    domain: Domain,
    algorithm: AlgorithmNumber,
    public_key: Vec<u8>,
}

fn parse_public_record(file: &Path, text: &str) -> Result<DnskeyRecord> {
    let mut lines = text
        .lines()
        .map(|line| line.split(';').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty());

    let line = lines
        .next()
        .ok_or_else(|| Error::format(file, "DNSKEY", "no DNSKEY record found"))?;
    if let Some(extra) = lines.next() {
        return Err(Error::format(
            file,
            "DNSKEY",
            format!("unexpected content after DNSKEY record: {extra:?}"),
        ));
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let (owner, rest) = match fields.len() {
        7 => (fields[0], &fields[1..]),
        8 => {
            fields[1]
                .parse::<u32>()
                .map_err(|_| Error::format(file, "TTL", format!("{:?} is not a TTL", fields[1])))?;
            (fields[0], &fields[2..])
        }
        n => {
            return Err(Error::format(
                file,
                "DNSKEY",
                format!("expected 7 fields (8 with a TTL), found {n}"),
            ))
        }
    };

    // rest = [class, type, flags, protocol, algorithm, public key]
    if !rest[0].eq_ignore_ascii_case("IN") {
        return Err(Error::format(
            file,
            "class",
            format!("expected IN, found {:?}", rest[0]),
        ));
    }
    if !rest[1].eq_ignore_ascii_case("DNSKEY") {
        return Err(Error::format(
            file,
            "type",
            format!("expected DNSKEY, found {:?}", rest[1]),
        ));
    }
    rest[2]
        .parse::<u16>()
        .map_err(|_| Error::format(file, "flags", format!("{:?} is not a 16-bit value", rest[2])))?;
    match rest[3].parse::<u8>() {
        Ok(DNSKEY_PROTOCOL) => {}
        _ => {
            return Err(Error::format(
                file,
                "protocol",
                format!("expected {DNSKEY_PROTOCOL}, found {:?}", rest[3]),
            ))
        }
    }

    let algorithm = AlgorithmNumber::new(rest[4]).map_err(as_format(file, "algorithm"))?;
    let domain = Domain::new(owner).map_err(as_format(file, "owner"))?;
    let public_key = decode_base64(file, "public key", rest[5])?;

    Ok(DnskeyRecord {
        domain,
        algorithm,
        public_key,
    })
}

struct PrivateFields {
    algorithm: AlgorithmNumber,
    algorithm_name: Option<String>,
    timing: KeyTiming,
    private_key: Vec<u8>,
}

#[derive(Default)]
struct RawPrivateFields<'a> {
    format: Option<&'a str>,
    algorithm: Option<&'a str>,
    created: Option<&'a str>,
    publish: Option<&'a str>,
    activate: Option<&'a str>,
    private_key: Option<&'a str>,
}

fn parse_private_record(file: &Path, text: &str) -> Result<PrivateFields> {
    let mut raw = RawPrivateFields::default();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or_else(|| {
            Error::format(file, "record", format!("line {line:?} is not a `Field: value` pair"))
        })?;
        let (field, slot) = match name.trim() {
            FIELD_FORMAT => (FIELD_FORMAT, &mut raw.format),
            FIELD_ALGORITHM => (FIELD_ALGORITHM, &mut raw.algorithm),
            FIELD_CREATED => (FIELD_CREATED, &mut raw.created),
            FIELD_PUBLISH => (FIELD_PUBLISH, &mut raw.publish),
            FIELD_ACTIVATE => (FIELD_ACTIVATE, &mut raw.activate),
            FIELD_PRIVATE_KEY => (FIELD_PRIVATE_KEY, &mut raw.private_key),
            // BIND writes further fields (SyncPublish, Inactive, ...) we don't use.
            _ => continue,
        };
        if slot.replace(value.trim()).is_some() {
            return Err(Error::format(file, field, "field appears more than once"));
        }
    }

    let format = required(file, FIELD_FORMAT, raw.format)?;
    if !format.starts_with("v1.") {
        return Err(Error::format(
            file,
            FIELD_FORMAT,
            format!("unsupported version {format:?}"),
        ));
    }

    let (algorithm, algorithm_name) =
        parse_algorithm_field(file, required(file, FIELD_ALGORITHM, raw.algorithm)?)?;

    let timing = KeyTiming {
        created: parse_timestamp(file, FIELD_CREATED, raw.created)?,
        publish: parse_timestamp(file, FIELD_PUBLISH, raw.publish)?,
        activate: parse_timestamp(file, FIELD_ACTIVATE, raw.activate)?,
    };

    let private_key = decode_base64(
        file,
        FIELD_PRIVATE_KEY,
        required(file, FIELD_PRIVATE_KEY, raw.private_key)?,
    )?;

    Ok(PrivateFields {
        algorithm,
        algorithm_name,
        timing,
        private_key,
    })
}

/// `031` or BIND's `031 (Dilithium2)`.
fn parse_algorithm_field(file: &Path, value: &str) -> Result<(AlgorithmNumber, Option<String>)> {
    let (number, mnemonic) = match value.split_once(char::is_whitespace) {
        Some((number, rest)) => (number, Some(rest.trim())),
        None => (value, None),
    };
    let number = AlgorithmNumber::new(number).map_err(as_format(file, FIELD_ALGORITHM))?;

    let name = match mnemonic {
        None => None,
        Some(rest) => {
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .map(str::trim)
                .filter(|inner| !inner.is_empty())
                .ok_or_else(|| {
                    Error::format(
                        file,
                        FIELD_ALGORITHM,
                        format!("unexpected text after algorithm number: {rest:?}"),
                    )
                })?;
            Some(inner.to_string())
        }
    };

    Ok((number, name))
}

fn parse_timestamp(file: &Path, field: &'static str, value: Option<&str>) -> Result<Timestamp> {
    Timestamp::parse(required(file, field, value)?).map_err(as_format(file, field))
}

fn required<'a>(file: &Path, field: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| Error::format(file, field, format!("missing `{field}:` line")))
}

fn decode_base64(file: &Path, field: &'static str, payload: &str) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(Error::format(file, field, "empty key payload"));
    }
    STANDARD.decode(payload).map_err(|source| Error::Encoding {
        file: file.to_path_buf(),
        field,
        source,
    })
}

/// Re-tag a value validation failure as a format error of `file`.
fn as_format<'a>(file: &'a Path, field: &'static str) -> impl FnOnce(Error) -> Error + 'a {
    move |err| match err {
        Error::Input { reason, .. } => Error::format(file, field, reason),
        other => Error::format(file, field, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keytag::compute_key_tag;

    const PUBLIC: &str = "; This is a DNSKEY record\n\
                          example.org. IN DNSKEY 257 3 031 AQID\n";
    const PRIVATE: &str = "Private-key-format: v1.3\n\
                           Algorithm: 031\n\
                           Created: 20260314092653\n\
                           Publish: 20260314092653\n\
                           Activate: 20260314092653\n\
                           PrivateKey: 3q2+7w==\n";

    fn format_field(err: Error) -> &'static str {
        match err {
            Error::Format { field, .. } => field,
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn parses_encoder_output() {
        let key = parse_key_records(PUBLIC, PRIVATE).unwrap();
        assert_eq!(key.domain().as_str(), "example.org");
        assert_eq!(key.algorithm_number().as_str(), "031");
        assert_eq!(key.algorithm().name(), None);
        assert_eq!(key.public_key(), &[1, 2, 3]);
        assert_eq!(key.private_key(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(key.key_tag(), compute_key_tag(&[1, 2, 3]));
        assert_eq!(key.timing().created.to_string(), "20260314092653");
    }

    #[test]
    fn accepts_bind_variations() {
        let public = "; This is a key-signing key, keyid 912, for example.org.\n\
                      ; Created: 20260314092653\n\
                      \n\
                      example.org. 3600 in dnskey 257 3 031 AQID ; ksk\n";
        let private = "Private-key-format: v1.3\n\
                       Algorithm: 031 (Dilithium2)\n\
                       Created: 20260314092653\n\
                       Publish: 20260314092653\n\
                       Activate: 20260314092653\n\
                       Inactive: 20270314092653\n\
                       PrivateKey: 3q2+7w==\n";
        let key = parse_key_records(public, private).unwrap();
        assert_eq!(key.algorithm().name(), Some("Dilithium2"));
        assert_eq!(key.public_key(), &[1, 2, 3]);
    }

    #[test]
    fn missing_private_key_line() {
        let private = PRIVATE.replace("PrivateKey: 3q2+7w==\n", "");
        let err = parse_key_records(PUBLIC, &private).unwrap_err();
        assert_eq!(format_field(err), "PrivateKey");
    }

    #[test]
    fn empty_private_key_payload() {
        let private = PRIVATE.replace("PrivateKey: 3q2+7w==", "PrivateKey:");
        let err = parse_key_records(PUBLIC, &private).unwrap_err();
        assert_eq!(format_field(err), "PrivateKey");
    }

    #[test]
    fn invalid_base64_is_an_encoding_error() {
        let private = PRIVATE.replace("3q2+7w==", "not*base64");
        let err = parse_key_records(PUBLIC, &private).unwrap_err();
        assert!(matches!(err, Error::Encoding { field: "PrivateKey", .. }));

        let public = PUBLIC.replace("AQID", "AQI$");
        let err = parse_key_records(&public, PRIVATE).unwrap_err();
        assert!(matches!(err, Error::Encoding { field: "public key", .. }));
    }

    #[test]
    fn missing_dnskey_line() {
        let err = parse_key_records("; This is a DNSKEY record\n", PRIVATE).unwrap_err();
        assert_eq!(format_field(err), "DNSKEY");
        let err = parse_key_records("", PRIVATE).unwrap_err();
        assert_eq!(format_field(err), "DNSKEY");
    }

    #[test]
    fn wrong_field_count() {
        let err =
            parse_key_records("example.org. IN DNSKEY 257 3 AQID\n", PRIVATE).unwrap_err();
        assert_eq!(format_field(err), "DNSKEY");
    }

    #[test]
    fn malformed_dnskey_fields() {
        let cases = [
            ("example.org. CH DNSKEY 257 3 031 AQID", "class"),
            ("example.org. IN DS 257 3 031 AQID", "type"),
            ("example.org. IN DNSKEY flags 3 031 AQID", "flags"),
            ("example.org. IN DNSKEY 257 2 031 AQID", "protocol"),
            ("example.org. IN DNSKEY 257 3 x31 AQID", "algorithm"),
            ("example.org. ttl IN DNSKEY 257 3 031 AQID", "TTL"),
            ("a+b.org. IN DNSKEY 257 3 031 AQID", "owner"),
            ("example.org.. IN DNSKEY 257 3 031 AQID", "owner"),
        ];
        for (line, field) in cases {
            let err = parse_key_records(line, PRIVATE).unwrap_err();
            assert_eq!(format_field(err), field, "line {line:?}");
        }
    }

    #[test]
    fn trailing_content_in_public_record() {
        let public = format!("{PUBLIC}example.org. IN DNSKEY 257 3 031 AQID\n");
        let err = parse_key_records(&public, PRIVATE).unwrap_err();
        assert_eq!(format_field(err), "DNSKEY");
    }

    #[test]
    fn private_record_grammar() {
        let cases = [
            (PRIVATE.replace("Private-key-format: v1.3\n", ""), "Private-key-format"),
            (PRIVATE.replace("v1.3", "v2.0"), "Private-key-format"),
            (PRIVATE.replace("Algorithm: 031\n", ""), "Algorithm"),
            (PRIVATE.replace("Algorithm: 031", "Algorithm: 031 Dilithium2"), "Algorithm"),
            (PRIVATE.replace("Created: 20260314092653\n", ""), "Created"),
            (PRIVATE.replace("Publish: 20260314092653", "Publish: 2026"), "Publish"),
            (PRIVATE.replace("Activate: 20260314092653", "Activate: soon"), "Activate"),
            (format!("{PRIVATE}PrivateKey: AQID\n"), "PrivateKey"),
            (format!("{PRIVATE}garbage\n"), "record"),
        ];
        for (private, field) in cases {
            let err = parse_key_records(PUBLIC, &private).unwrap_err();
            assert_eq!(format_field(err), field, "record {private:?}");
        }
    }

    #[test]
    fn algorithm_mismatch_between_files() {
        let private = PRIVATE.replace("Algorithm: 031", "Algorithm: 17");
        let err = parse_key_records(PUBLIC, &private).unwrap_err();
        assert_eq!(format_field(err), "Algorithm");
    }

    #[test]
    fn errors_name_the_file_and_field() {
        let err = parse_key_records(PUBLIC, "Private-key-format: v1.3\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains(PRIVATE_RECORD_ORIGIN), "{message}");
        assert!(message.contains("Algorithm"), "{message}");
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let err = parse_key_files("/nonexistent/Kx+031+1.key", "/nonexistent/Kx+031+1.private")
            .unwrap_err();
        match err {
            Error::Io { path, .. } => assert_eq!(path, Path::new("/nonexistent/Kx+031+1.key")),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
