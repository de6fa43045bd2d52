use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256, Sha512};

use crate::core::errors::{Result, WrapError};

/// Digest algorithms the `checksum` command offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

impl ChecksumAlgorithm {
    /// Length of the hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            ChecksumAlgorithm::Sha256 => 64,
            ChecksumAlgorithm::Sha512 => 128,
        }
    }
}

/// Compute the hex digest of the file at `path`, streaming its content.
pub fn file_digest(path: &Path, algorithm: ChecksumAlgorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => WrapError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => WrapError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    let mut reader = BufReader::new(file);

    let hex = match algorithm {
        ChecksumAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            io::copy(&mut reader, &mut hasher)?;
            format!("{:x}", hasher.finalize())
        }
        ChecksumAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            io::copy(&mut reader, &mut hasher)?;
            format!("{:x}", hasher.finalize())
        }
    };

    Ok(hex)
}

/// Find the expected digest for `file_name` in a checksum list.
///
/// List format: `<hex>  <name>` per line (two spaces, or a space and `*`
/// for binary mode). Blank lines and `#` comments are skipped.
pub fn lookup_expected(list: &str, file_name: &str) -> Option<String> {
    list.lines().find_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (hash, name) = line.split_once(char::is_whitespace)?;
        let name = name.trim_start();
        let name = name.strip_prefix('*').unwrap_or(name);
        (name == file_name).then(|| hash.to_lowercase())
    })
}

/// Compare the digest of `path` with `expected` (case-insensitive).
pub fn verify(path: &Path, algorithm: ChecksumAlgorithm, expected: &str) -> Result<String> {
    let computed = file_digest(path, algorithm)?;
    let expected = expected.trim().to_lowercase();

    if computed != expected {
        return Err(WrapError::ChecksumMismatch {
            path: path.to_path_buf(),
            computed,
            expected,
        });
    }

    Ok(computed)
}
