//! File naming conventions for the artifacts doublewrap produces.
//!
//! The encrypted and decrypted names must stay stable so that files
//! produced by older releases keep decrypting.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, WrapError};

/// Suffix appended to the plaintext path to name the encrypted output.
pub const ENCRYPTED_SUFFIX: &str = ".asymmetric.gpg";

/// Suffix of the recovered plaintext.
pub const DECRYPTED_SUFFIX: &str = ".decrypted";

/// Suffix of the intermediate symmetric layer.
pub const SCRATCH_SUFFIX: &str = ".symmetric.gpg";

/// Suffix of an output still being written by the engine.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// `notes.txt` → `notes.txt.asymmetric.gpg`
pub fn encrypted_path(plaintext: &Path) -> PathBuf {
    let mut name = plaintext.as_os_str().to_os_string();
    name.push(ENCRYPTED_SUFFIX);
    PathBuf::from(name)
}

/// `notes.txt.asymmetric.gpg` → `notes.decrypted`
///
/// Strips the encrypted suffix, then the original extension if there is
/// one. Fails for names that do not carry the suffix. Works on the raw
/// file name, so names that are not valid UTF-8 are accepted.
pub fn decrypted_path(encrypted: &Path) -> Result<PathBuf> {
    let unrecognized = || WrapError::UnrecognizedSuffix {
        path: encrypted.to_path_buf(),
        expected: ENCRYPTED_SUFFIX,
    };

    let name = Path::new(encrypted.file_name().ok_or_else(unrecognized)?);
    if name.extension() != Some(OsStr::new("gpg")) {
        return Err(unrecognized());
    }
    let inner = Path::new(name.file_stem().ok_or_else(unrecognized)?);
    if inner.extension() != Some(OsStr::new("asymmetric")) {
        return Err(unrecognized());
    }
    let original = Path::new(inner.file_stem().ok_or_else(unrecognized)?);
    let stem = original.file_stem().unwrap_or(original.as_os_str());

    let mut decrypted = stem.to_os_string();
    decrypted.push(DECRYPTED_SUFFIX);
    Ok(encrypted.with_file_name(decrypted))
}

/// Whether the path carries the encrypted suffix.
pub fn has_encrypted_suffix(path: &Path) -> bool {
    decrypted_path(path).is_ok()
}

/// Directory an artifact lives in; `.` for bare file names.
pub fn work_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Name prefix for a scratch file derived from `source`.
///
/// The random part is appended by the caller when the file is created.
pub fn scratch_prefix(source: &Path, now: chrono::DateTime<chrono::Utc>) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    format!(".{base}.{}.", now.format("%Y%m%dT%H%M%S%9f"))
}

/// Whether a file name looks like a doublewrap scratch or staged output file.
#[cfg(test)]
pub fn is_scratch_name(name: &str) -> bool {
    name.starts_with('.') && (name.ends_with(SCRATCH_SUFFIX) || name.ends_with(PARTIAL_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encrypted_name_appends_suffix() {
        assert_eq!(
            encrypted_path(Path::new("notes.txt")),
            PathBuf::from("notes.txt.asymmetric.gpg")
        );
        assert_eq!(
            encrypted_path(Path::new("/tmp/dir/archive.tar.gz")),
            PathBuf::from("/tmp/dir/archive.tar.gz.asymmetric.gpg")
        );
        assert_eq!(
            encrypted_path(Path::new("README")),
            PathBuf::from("README.asymmetric.gpg")
        );
    }

    #[test]
    fn decrypted_name_drops_suffix_and_extension() {
        assert_eq!(
            decrypted_path(Path::new("notes.txt.asymmetric.gpg")).unwrap(),
            PathBuf::from("notes.decrypted")
        );
        assert_eq!(
            decrypted_path(Path::new("/data/archive.asymmetric.gpg")).unwrap(),
            PathBuf::from("/data/archive.decrypted")
        );
        assert_eq!(
            decrypted_path(Path::new("backup.tar.gz.asymmetric.gpg")).unwrap(),
            PathBuf::from("backup.tar.decrypted")
        );
    }

    #[test]
    fn decrypted_name_rejects_foreign_files() {
        for name in ["notes.txt", "notes.txt.gpg", "notes.symmetric.gpg", ".asymmetric.gpg"] {
            let err = decrypted_path(Path::new(name)).unwrap_err();
            assert!(
                matches!(err, WrapError::UnrecognizedSuffix { .. }),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn decrypted_name_keeps_dotfiles() {
        assert_eq!(
            decrypted_path(Path::new(".bashrc.asymmetric.gpg")).unwrap(),
            PathBuf::from(".bashrc.decrypted")
        );
    }

    #[cfg(unix)]
    #[test]
    fn decrypted_name_accepts_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let encrypted = Path::new("/data").join(OsStr::from_bytes(b"caf\xe9.txt.asymmetric.gpg"));
        let decrypted = decrypted_path(&encrypted).unwrap();

        assert_eq!(decrypted.parent(), Some(Path::new("/data")));
        assert_eq!(
            decrypted.file_name().unwrap().as_bytes(),
            b"caf\xe9.decrypted"
        );
        assert!(has_encrypted_suffix(&encrypted));
    }

    #[test]
    fn work_dir_of_bare_name_is_current_dir() {
        assert_eq!(work_dir(Path::new("notes.txt")), Path::new("."));
        assert_eq!(work_dir(Path::new("a/b/notes.txt")), Path::new("a/b"));
    }

    #[test]
    fn scratch_prefix_is_hidden_and_timestamped() {
        let now = chrono::Utc
            .with_ymd_and_hms(2026, 3, 4, 5, 6, 7)
            .unwrap();
        let prefix = scratch_prefix(Path::new("dir/notes.txt"), now);
        assert_eq!(prefix, ".notes.txt.20260304T050607000000000.");
        assert!(is_scratch_name(&format!("{prefix}abc123{SCRATCH_SUFFIX}")));
        assert!(!is_scratch_name("notes.txt.asymmetric.gpg"));
    }
}
