// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pqdnssec-keygen — post-quantum DNSSEC key generator
//
// Generates a post-quantum signature key pair and writes it as a BIND-style
// file pair:
//
//   K<domain>+<algorithm>+<keytag>.key      DNSKEY record      (0644)
//   K<domain>+<algorithm>+<keytag>.private  Private-key-format (0600)
//
// FIPS 204: ML-DSA / Dilithium
// FIPS 205: SLH-DSA / SPHINCS+

mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use pqdnssec_common::{
    generate_key_material, load_key_files, parse_key_file_name, write_key_files, AlgorithmNumber,
    Domain, KeyFileKind, KeyFilePaths, KeyMaterial, KeyMaterialProvider, KeyTiming,
    PqcryptoProvider, Timestamp,
};
use tracing::{info, warn};

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "pqdnssec-keygen",
    about = "Post-quantum DNSSEC key generator (BIND .key/.private file pairs)"
)]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key pair and write its .key and .private files
    Generate {
        /// Post-quantum signature algorithm name (see `algorithms`)
        #[arg(long)]
        algorithm: String,

        /// DNSKEY algorithm number written to both files, e.g. 031
        #[arg(long)]
        number: String,

        /// Domain name the key belongs to [default: mydomain.org]
        #[arg(long)]
        domain: Option<String>,

        /// Directory the key files are written to [default: .]
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// List supported and enabled signature algorithms
    Algorithms,

    /// Parse a .key/.private pair and check it against its file names
    Inspect {
        /// Public key file (.key)
        public: PathBuf,

        /// Private key file (.private)
        private: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let provider = PqcryptoProvider::new();

    match args.command {
        Command::Generate {
            algorithm,
            number,
            domain,
            out_dir,
        } => {
            let request = GenerateRequest {
                algorithm,
                number,
                domain: domain.unwrap_or(config.domain),
                out_dir: out_dir.unwrap_or(config.out_dir),
            };
            let timing = KeyTiming::uniform(Timestamp::now());
            let (key, paths) = generate(&provider, &request, timing)?;
            print_summary(&key, &paths);
            Ok(())
        }
        Command::Algorithms => {
            print_algorithms(&provider);
            Ok(())
        }
        Command::Inspect { public, private } => inspect(&public, &private).await,
    }
}

struct GenerateRequest {
    algorithm: String,
    number: String,
    domain: String,
    out_dir: PathBuf,
}

/// Validate the request, generate a key pair and write both key files.
fn generate(
    provider: &dyn KeyMaterialProvider,
    request: &GenerateRequest,
    timing: KeyTiming,
) -> anyhow::Result<(KeyMaterial, KeyFilePaths)> {
    let domain = Domain::new(&request.domain)?;
    let number = AlgorithmNumber::new(&request.number)?;

    info!(
        domain = %domain,
        algorithm = %request.algorithm,
        number = %number,
        "generating key pair"
    );

    let key = generate_key_material(provider, &request.algorithm, number, domain, timing)
        .with_context(|| {
            format!(
                "generating {} key pair (run `pqdnssec-keygen algorithms` for the enabled list)",
                request.algorithm
            )
        })?;

    let paths = write_key_files(&request.out_dir, &key)
        .with_context(|| format!("writing key files to {}", request.out_dir.display()))?;

    Ok((key, paths))
}

fn print_summary(key: &KeyMaterial, paths: &KeyFilePaths) {
    println!("Keys generated successfully:");
    println!("Domain:           {}", key.domain());
    println!("Algorithm:        {}", key.algorithm().name().unwrap_or("-"));
    println!("Algorithm Number: {}", key.algorithm_number());
    println!("Key tag:          {}", key.key_tag());
    println!("Public key:       {}", paths.public.display());
    println!("Private key:      {}", paths.private.display());
}

fn print_algorithms(provider: &dyn KeyMaterialProvider) {
    println!("Supported signature algorithms:");
    for name in provider.supported_algorithms() {
        println!(" - {name}");
    }

    println!();
    println!("Enabled signature algorithms:");
    for name in provider.enabled_algorithms() {
        println!(" - {name}");
    }

    println!();
    println!("Examples:");
    println!("  pqdnssec-keygen generate --algorithm Dilithium2 --number 31");
    println!("  pqdnssec-keygen generate --domain example.com --algorithm Dilithium3 --number 17");
    println!(
        "  pqdnssec-keygen generate --algorithm SPHINCS+-SHA2-128f-simple --number 18 --domain test.org"
    );
}

async fn inspect(public: &Path, private: &Path) -> anyhow::Result<()> {
    let key = load_key_files(public, private).await?;

    println!("Domain:           {}", key.domain());
    println!("Algorithm Number: {}", key.algorithm_number());
    if let Some(name) = key.algorithm().name() {
        println!("Algorithm:        {name}");
    }
    println!("Key tag:          {}", key.key_tag());
    println!("Public key:       {} bytes", key.public_key().len());
    println!("Private key:      {} bytes", key.private_key().len());
    println!("Created:          {}", key.timing().created);
    println!("Publish:          {}", key.timing().publish);
    println!("Activate:         {}", key.timing().activate);

    let mismatched = check_file_names(&key, public, private);
    if !mismatched.is_empty() {
        anyhow::bail!(
            "key file name does not match key contents: {}",
            mismatched
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

/// Files whose canonical name disagrees with `key` (domain, number or
/// recomputed tag) or with their role. Non-canonical names are only logged.
fn check_file_names<'a>(key: &KeyMaterial, public: &'a Path, private: &'a Path) -> Vec<&'a Path> {
    [(public, KeyFileKind::Public), (private, KeyFileKind::Private)]
        .into_iter()
        .filter(|(path, kind)| match parse_key_file_name(path) {
            Ok(name) => !name.matches(key) || name.kind != *kind,
            Err(e) => {
                warn!(error = %e, "not a canonical key file name, skipping name check");
                false
            }
        })
        .map(|(path, _)| path)
        .collect()
}
