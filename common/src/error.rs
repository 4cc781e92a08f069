// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error kinds for key material construction, encoding, parsing and storage.
//
//   Input     — a required value is empty or invalid before anything is encoded
//   Format    — record text does not follow the key file grammar
//   Encoding  — a Base64 payload does not decode
//   Io        — a key file could not be read or written
//   Provider  — the key material provider refused the request

use std::path::PathBuf;

use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid {field}: {reason}")]
    Input { field: &'static str, reason: String },

    #[error("{}: field `{field}`: {reason}", file.display())]
    Format {
        file: PathBuf,
        field: &'static str,
        reason: String,
    },

    #[error("{}: field `{field}`: invalid base64: {source}", file.display())]
    Encoding {
        file: PathBuf,
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl Error {
    pub(crate) fn input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Input {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn format(
        file: impl Into<PathBuf>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Format {
            file: file.into(),
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
