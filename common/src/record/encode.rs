// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{
    DNSKEY_FLAGS, DNSKEY_PROTOCOL, FIELD_ACTIVATE, FIELD_ALGORITHM, FIELD_CREATED, FIELD_FORMAT,
    FIELD_PRIVATE_KEY, FIELD_PUBLISH, PRIVATE_KEY_FORMAT, PUBLIC_RECORD_COMMENT,
};
use crate::error::{Error, Result};
use crate::key::{AlgorithmNumber, Domain, KeyMaterial, KeyTiming};

/// Render the `.key` file contents for a public key.
pub fn encode_public_record(
    domain: &Domain,
    algorithm: &AlgorithmNumber,
    public_key: &[u8],
) -> Result<String> {
    if public_key.is_empty() {
        return Err(Error::input("public key", "must not be empty"));
    }

    Ok(format!(
        "{PUBLIC_RECORD_COMMENT}\n{} IN DNSKEY {DNSKEY_FLAGS} {DNSKEY_PROTOCOL} {} {}\n",
        domain.fqdn(),
        algorithm,
        STANDARD.encode(public_key),
    ))
}

/// Render the `.private` file contents for a private key.
pub fn encode_private_record(
    algorithm: &AlgorithmNumber,
    timing: &KeyTiming,
    private_key: &[u8],
) -> Result<String> {
    if private_key.is_empty() {
        return Err(Error::input("private key", "must not be empty"));
    }

    Ok(format!(
        "{FIELD_FORMAT}: {PRIVATE_KEY_FORMAT}\n\
         {FIELD_ALGORITHM}: {algorithm}\n\
         {FIELD_CREATED}: {}\n\
         {FIELD_PUBLISH}: {}\n\
         {FIELD_ACTIVATE}: {}\n\
         {FIELD_PRIVATE_KEY}: {}\n",
        timing.created,
        timing.publish,
        timing.activate,
        STANDARD.encode(private_key),
    ))
}

impl KeyMaterial {
    /// `.key` file contents.
    pub fn public_record(&self) -> Result<String> {
        encode_public_record(self.domain(), self.algorithm_number(), self.public_key())
    }

    /// `.private` file contents.
    pub fn private_record(&self) -> Result<String> {
        encode_private_record(self.algorithm_number(), self.timing(), self.private_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Timestamp;

    fn timing() -> KeyTiming {
        KeyTiming::uniform(Timestamp::parse("20260314092653").unwrap())
    }

    #[test]
    fn public_record_layout() {
        let record = encode_public_record(
            &Domain::new("example.org").unwrap(),
            &AlgorithmNumber::new("031").unwrap(),
            &[0x01, 0x02, 0x03],
        )
        .unwrap();

        let lines: Vec<&str> = record.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "; This is a DNSKEY record");
        assert_eq!(lines[1], "example.org. IN DNSKEY 257 3 031 AQID");
        assert!(record.ends_with('\n'));
    }

    #[test]
    fn public_record_from_dotted_domain_has_single_dot() {
        let record = encode_public_record(
            &Domain::new("example.org.").unwrap(),
            &AlgorithmNumber::new("17").unwrap(),
            b"k",
        )
        .unwrap();
        assert!(record.contains("\nexample.org. IN DNSKEY 257 3 17 aw==\n"));
    }

    #[test]
    fn private_record_layout() {
        let record = encode_private_record(
            &AlgorithmNumber::new("031").unwrap(),
            &timing(),
            &[0xde, 0xad, 0xbe, 0xef],
        )
        .unwrap();

        assert_eq!(
            record,
            "Private-key-format: v1.3\n\
             Algorithm: 031\n\
             Created: 20260314092653\n\
             Publish: 20260314092653\n\
             Activate: 20260314092653\n\
             PrivateKey: 3q2+7w==\n"
        );
    }

    #[test]
    fn diverging_timestamps_are_written_as_given() {
        let timing = KeyTiming {
            created: Timestamp::parse("20260101000000").unwrap(),
            publish: Timestamp::parse("20260102000000").unwrap(),
            activate: Timestamp::parse("20260103000000").unwrap(),
        };
        let record =
            encode_private_record(&AlgorithmNumber::new("18").unwrap(), &timing, b"sk").unwrap();
        assert!(record.contains("Created: 20260101000000\n"));
        assert!(record.contains("Publish: 20260102000000\n"));
        assert!(record.contains("Activate: 20260103000000\n"));
    }

    #[test]
    fn empty_keys_are_input_errors() {
        let err = encode_public_record(
            &Domain::new("example.org").unwrap(),
            &AlgorithmNumber::new("031").unwrap(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Input { field: "public key", .. }));

        let err = encode_private_record(&AlgorithmNumber::new("031").unwrap(), &timing(), &[])
            .unwrap_err();
        assert!(matches!(err, Error::Input { field: "private key", .. }));
    }
}
