// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key generator configuration.
//
// Precedence (lowest first): built-in defaults, JSON config file,
// environment variables, command-line flags.
//
//   PQDNSSEC_DOMAIN   — domain used when --domain is not given (default: mydomain.org)
//   PQDNSSEC_OUT_DIR  — directory key files are written to (default: .)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const ENV_DOMAIN: &str = "PQDNSSEC_DOMAIN";
pub const ENV_OUT_DIR: &str = "PQDNSSEC_OUT_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Domain the generated key belongs to (default: mydomain.org)
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Output directory for .key / .private files (default: .)
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_domain() -> String {
    "mydomain.org".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            out_dir: default_out_dir(),
        }
    }
}

impl Config {
    /// Defaults, then `file` if given, then the process environment.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Override fields from environment variables looked up through `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(domain) = var(ENV_DOMAIN).filter(|v| !v.is_empty()) {
            self.domain = domain;
        }
        if let Some(dir) = var(ENV_OUT_DIR).filter(|v| !v.is_empty()) {
            self.out_dir = PathBuf::from(dir);
        }
        self
    }
}
