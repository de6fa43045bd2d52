use std::fs::OpenOptions;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use rand::RngCore;

const CHUNK: usize = 64 * 1024;

/// How a file left the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeOutcome {
    /// Overwritten in place, then unlinked.
    Shredded,
    /// Overwriting failed; the file was only unlinked.
    Removed,
    /// Nothing to do.
    Missing,
}

/// Overwrite `path` `passes` times and unlink it.
///
/// Every pass but the last writes random data, the last writes zeros, and
/// each pass is synced before the next starts. When the file cannot be
/// overwritten it is still unlinked. Copy-on-write and journaling
/// filesystems may keep old blocks regardless.
pub fn shred(path: &Path, passes: u32) -> io::Result<WipeOutcome> {
    if !path.exists() {
        return Ok(WipeOutcome::Missing);
    }

    let outcome = match overwrite(path, passes) {
        Ok(()) => WipeOutcome::Shredded,
        Err(_) => WipeOutcome::Removed,
    };

    match std::fs::remove_file(path) {
        Ok(()) => Ok(outcome),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(WipeOutcome::Missing),
        Err(e) => Err(e),
    }
}

/// Unlink `path` without overwriting, tolerating its absence.
pub fn remove(path: &Path) -> io::Result<WipeOutcome> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(WipeOutcome::Removed),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(WipeOutcome::Missing),
        Err(e) => Err(e),
    }
}

fn overwrite(path: &Path, passes: u32) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    let len = file.metadata()?.len();
    let mut buf = vec![0u8; CHUNK];
    let mut rng = rand::thread_rng();

    for pass in 0..passes.max(1) {
        let last = pass + 1 == passes.max(1);
        file.seek(SeekFrom::Start(0))?;

        let mut remaining = len;
        while remaining > 0 {
            let n = usize::try_from(remaining).map_or(CHUNK, |r| r.min(CHUNK));
            if last {
                buf[..n].fill(0);
            } else {
                rng.fill_bytes(&mut buf[..n]);
            }
            file.write_all(&buf[..n])?;
            remaining -= n as u64;
        }

        file.sync_data()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shred_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.bin");
        std::fs::write(&path, vec![0xAB; 200_000]).unwrap();

        let outcome = shred(&path, 3).unwrap();
        assert_eq!(outcome, WipeOutcome::Shredded);
        assert!(!path.exists());
    }

    #[test]
    fn overwrite_leaves_zeros_after_final_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.bin");
        std::fs::write(&path, b"attack at dawn").unwrap();

        overwrite(&path, 2).unwrap();
        let content = std::fs::read(&path).unwrap();
        assert_eq!(content.len(), 14);
        assert!(content.iter().all(|b| *b == 0));
    }

    #[test]
    fn shred_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = shred(&dir.path().join("nope"), 3).unwrap();
        assert_eq!(outcome, WipeOutcome::Missing);
    }

    #[test]
    fn shred_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(shred(&path, 3).unwrap(), WipeOutcome::Shredded);
        assert!(!path.exists());
    }

    #[test]
    fn remove_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(remove(&dir.path().join("nope")).unwrap(), WipeOutcome::Missing);
    }
}
