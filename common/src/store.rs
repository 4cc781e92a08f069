// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key file persistence.
//
// Both records are encoded before anything touches the disk. The public
// file is created world-readable (0644), the private file owner-only (0600).
// Existing files are never replaced. If the private file cannot be written
// the public file written just before it is removed again, so no `.key`
// file is left behind without its `.private` half. A file that fails after
// it was created is removed too, so no truncated `.private` file remains.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::key::KeyMaterial;
use crate::naming::KeyFileNames;

/// Mode of `.key` files.
pub const PUBLIC_FILE_MODE: u32 = 0o644;
/// Mode of `.private` files.
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Locations of a written key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFilePaths {
    pub public: PathBuf,
    pub private: PathBuf,
}

/// Write the `.key` / `.private` pair for `key` into `dir`.
pub fn write_key_files(dir: impl AsRef<Path>, key: &KeyMaterial) -> Result<KeyFilePaths> {
    let dir = dir.as_ref();
    let public_record = key.public_record()?;
    let private_record = key.private_record()?;

    let names = KeyFileNames::for_key(key);
    let paths = KeyFilePaths {
        public: dir.join(&names.public),
        private: dir.join(&names.private),
    };

    create_file(&paths.public, public_record.as_bytes(), PUBLIC_FILE_MODE)?;

    if let Err(err) = create_file(&paths.private, private_record.as_bytes(), PRIVATE_FILE_MODE) {
        if let Err(cleanup) = fs::remove_file(&paths.public) {
            warn!(
                path = %paths.public.display(),
                error = %cleanup,
                "could not remove public key file after private key write failed"
            );
        }
        return Err(err);
    }

    info!(
        domain = %key.domain(),
        algorithm = %key.algorithm_number(),
        key_tag = %key.key_tag(),
        public = %paths.public.display(),
        private = %paths.private.display(),
        "wrote key files"
    );

    Ok(paths)
}

fn create_file(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    create_file_with(path, mode, |file| file.write_all(contents))
}

/// Create `path` with `mode` and fill it through `write`. Once the file
/// exists, any later failure removes it again.
fn create_file_with(
    path: &Path,
    mode: u32,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| Error::io(path, e))?;

    let filled = write(&mut file).and_then(|()| file.sync_all()).and_then(|()| {
        // The creation mode is filtered through the umask; pin it explicitly.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        }
        Ok(())
    });

    if let Err(err) = filled {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(
                path = %path.display(),
                error = %cleanup,
                "could not remove partially written key file"
            );
        }
        return Err(Error::io(path, err));
    }

    Ok(())
}
