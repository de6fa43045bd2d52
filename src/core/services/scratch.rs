//! Scoped ownership of files that must not outlive an operation.
//!
//! A [`ScratchFile`] disposes of its path when dropped unless it was
//! [kept](ScratchFile::keep). Every live guard is also recorded in a
//! process-wide registry so the interrupt watcher can purge them before
//! the process exits on a signal.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::core::errors::{Result, WrapError};
use crate::core::models::artifact::{self, PARTIAL_SUFFIX, SCRATCH_SUFFIX};
use crate::core::services::wipe::{self, WipeOutcome};

const RANDOM_CHARS: usize = 12;

/// How a guarded file is disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// Overwrite with the given number of passes, then unlink.
    Shred { passes: u32 },
    /// Plain unlink.
    Remove,
}

impl Disposal {
    fn apply(self, path: &Path) -> io::Result<WipeOutcome> {
        match self {
            Disposal::Shred { passes } => wipe::shred(path, passes),
            Disposal::Remove => wipe::remove(path),
        }
    }
}

#[derive(Debug)]
struct Tracked {
    path: PathBuf,
    disposal: Disposal,
}

/// Set of guarded files that are still on disk.
#[derive(Debug)]
pub struct Registry {
    live: Mutex<Vec<Tracked>>,
}

static GLOBAL: Registry = Registry::new();

/// The registry every [`ScratchFile`] of this process reports to.
pub fn registry() -> &'static Registry {
    &GLOBAL
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            live: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Tracked>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, path: &Path, disposal: Disposal) {
        self.lock().push(Tracked {
            path: path.to_path_buf(),
            disposal,
        });
    }

    fn untrack(&self, path: &Path) -> Option<Tracked> {
        let mut live = self.lock();
        let idx = live.iter().position(|t| t.path == path)?;
        Some(live.swap_remove(idx))
    }

    /// Dispose of the tracked file at `path` while holding the lock, so a
    /// concurrent [`Registry::purge_all`] waits for it instead of racing.
    fn release(&self, path: &Path) -> Option<io::Result<WipeOutcome>> {
        let mut live = self.lock();
        let idx = live.iter().position(|t| t.path == path)?;
        let tracked = live.swap_remove(idx);
        Some(tracked.disposal.apply(&tracked.path))
    }

    /// Move the tracked file at `path` to `dest` and stop tracking it. The
    /// lock is held across the rename so a purge sees either name, never
    /// a half-moved file.
    fn persist(&self, path: &Path, dest: &Path) -> Option<io::Result<()>> {
        let mut live = self.lock();
        let idx = live.iter().position(|t| t.path == path)?;
        if let Err(e) = std::fs::rename(path, dest) {
            return Some(Err(e));
        }
        live.swap_remove(idx);
        Some(Ok(()))
    }

    /// Dispose of every live guarded file. Returns how many were handled.
    pub fn purge_all(&self) -> usize {
        let mut live = self.lock();
        let count = live.len();
        for tracked in live.drain(..) {
            let _ = tracked.disposal.apply(&tracked.path);
        }
        count
    }

    /// Paths currently guarded.
    #[cfg(test)]
    pub fn live_paths(&self) -> Vec<PathBuf> {
        self.lock().iter().map(|t| t.path.clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard over a file that is disposed of on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    armed: bool,
    registry: &'static Registry,
}

impl ScratchFile {
    /// Create a fresh, uniquely named scratch file in `dir`.
    ///
    /// The name is derived from `source`, the current time and random
    /// characters, and the file is created exclusively so concurrent
    /// invocations in the same directory cannot collide.
    pub fn reserve(dir: &Path, source: &Path, disposal: Disposal) -> Result<Self> {
        Self::create(dir, source, SCRATCH_SUFFIX, disposal)
    }

    /// Create a hidden sibling of `output` for the engine to write into.
    ///
    /// The real output path is only touched by [`ScratchFile::persist`], so
    /// a failed run leaves any earlier file at `output` as it was.
    pub fn stage_output(output: &Path, disposal: Disposal) -> Result<Self> {
        Self::create(artifact::work_dir(output), output, PARTIAL_SUFFIX, disposal)
    }

    fn create(dir: &Path, source: &Path, suffix: &str, disposal: Disposal) -> Result<Self> {
        let prefix = artifact::scratch_prefix(source, chrono::Utc::now());

        let created = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(suffix)
            .rand_bytes(RANDOM_CHARS)
            .tempfile_in(dir)
            .map_err(|e| WrapError::DirectoryNotWritable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;

        let (_file, path) = created.keep().map_err(|e| WrapError::DirectoryNotWritable {
            path: dir.to_path_buf(),
            reason: e.error.to_string(),
        })?;

        Ok(Self::guard(path, disposal))
    }

    /// Take ownership of an existing (or future) `path`.
    pub fn guard(path: PathBuf, disposal: Disposal) -> Self {
        Self::guard_in(registry(), path, disposal)
    }

    fn guard_in(registry: &'static Registry, path: PathBuf, disposal: Disposal) -> Self {
        registry.track(&path, disposal);
        Self {
            path,
            armed: true,
            registry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dispose of the file now, reporting how it went.
    pub fn dispose(mut self) -> io::Result<WipeOutcome> {
        self.armed = false;
        self.registry
            .release(&self.path)
            .unwrap_or(Ok(WipeOutcome::Missing))
    }

    /// Move the file to `dest`, replacing whatever is there. On failure
    /// the guard still disposes of the file when dropped.
    pub fn persist(mut self, dest: &Path) -> Result<PathBuf> {
        match self.registry.persist(&self.path, dest) {
            Some(moved) => moved?,
            None => std::fs::rename(&self.path, dest)?,
        }
        self.armed = false;
        Ok(dest.to_path_buf())
    }

    /// Stop guarding the file and leave it on disk.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        self.registry.untrack(&self.path);
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.registry.release(&self.path);
        }
    }
}
