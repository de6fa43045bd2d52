use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::adapters::engine::gpg_listing;
use crate::core::errors::{Result, WrapError};
use crate::core::models::cipher_params::{CipherParams, S2K_MODE_ITERATED_SALTED};
use crate::core::models::key_info::KeyInfo;
use crate::core::models::packet_listing::PacketListing;
use crate::core::traits::engine::OpenPgpEngine;

/// OpenPGP engine that shells out to the system `gpg` binary.
///
/// Passphrase stages inherit the terminal so gpg (or its pinentry) can
/// prompt the user directly; doublewrap never sees the passphrase.
pub struct GpgEngine {
    /// Path to the gpg binary (defaults to "gpg").
    gpg_path: PathBuf,
    /// Alternative GnuPG home directory.
    homedir: Option<PathBuf>,
}

impl GpgEngine {
    /// Create a new engine using the default `gpg` binary.
    pub fn new() -> Self {
        Self::with_path(PathBuf::from("gpg"))
    }

    /// Create a new engine with a custom gpg binary path.
    pub fn with_path(gpg_path: PathBuf) -> Self {
        Self {
            gpg_path,
            homedir: None,
        }
    }

    pub fn homedir(mut self, homedir: Option<PathBuf>) -> Self {
        self.homedir = homedir;
        self
    }

    pub fn gpg_path(&self) -> &Path {
        &self.gpg_path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.gpg_path);
        if let Some(home) = &self.homedir {
            cmd.arg("--homedir").arg(home);
        }
        cmd
    }

    fn spawn_error(&self, operation: &'static str, e: io::Error) -> WrapError {
        if e.kind() == io::ErrorKind::NotFound {
            WrapError::EngineUnavailable {
                program: self.gpg_path.display().to_string(),
            }
        } else {
            WrapError::EngineFailed {
                operation,
                detail: format!("failed to run {}: {e}", self.gpg_path.display()),
            }
        }
    }

    /// Run with the terminal attached, for stages that may prompt.
    fn run_interactive(&self, operation: &'static str, mut cmd: Command) -> Result<()> {
        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.spawn_error(operation, e))?;

        if !status.success() {
            return Err(WrapError::EngineFailed {
                operation,
                detail: format!("gpg exited with {status}"),
            });
        }
        Ok(())
    }

    /// Run non-interactively and capture both output streams.
    fn run_captured(&self, operation: &'static str, mut cmd: Command) -> Result<Output> {
        cmd.stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(operation, e))
    }
}

impl Default for GpgEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenPgpEngine for GpgEngine {
    fn is_available(&self) -> bool {
        self.command()
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn symmetric_encrypt(&self, input: &Path, output: &Path, params: &CipherParams) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["--symmetric", "--yes"])
            .args(["--cipher-algo", params.cipher_algo.as_str()])
            .args(["--s2k-cipher-algo", params.cipher_algo.as_str()])
            .args(["--s2k-digest-algo", params.digest_algo.as_str()])
            .arg("--s2k-mode")
            .arg(S2K_MODE_ITERATED_SALTED.to_string())
            .arg("--s2k-count")
            .arg(params.kdf_iterations.to_string())
            .args(["--compress-algo", params.compress_algo.as_str()])
            .arg("--output")
            .arg(output)
            .arg(input);

        self.run_interactive("symmetric encryption", cmd)
    }

    fn public_key_encrypt(
        &self,
        input: &Path,
        output: &Path,
        recipient: &str,
        params: &CipherParams,
    ) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["--batch", "--yes", "--encrypt"])
            .args(["--recipient", recipient])
            .args(["--trust-model", "always"])
            .args(["--cipher-algo", params.cipher_algo.as_str()])
            .args(["--digest-algo", params.digest_algo.as_str()])
            .args(["--compress-algo", params.compress_algo.as_str()])
            .arg("--output")
            .arg(output)
            .arg(input);

        let out = self.run_captured("public-key encryption", cmd)?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(WrapError::EngineFailed {
                operation: "public-key encryption",
                detail: format!("gpg exited with {}: {}", out.status, stderr.trim()),
            });
        }
        Ok(())
    }

    fn decrypt(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["--yes", "--decrypt", "--output"])
            .arg(output)
            .arg(input);

        self.run_interactive("decryption", cmd)
    }

    fn list_keys(&self, identity: &str) -> Result<Vec<KeyInfo>> {
        let mut cmd = self.command();
        cmd.args(["--batch", "--with-colons", "--list-keys", "--", identity]);

        let out = self.run_captured("key listing", cmd)?;
        // A missing key is a non-zero exit with no `pub` records.
        Ok(gpg_listing::parse_key_listing(&String::from_utf8_lossy(
            &out.stdout,
        )))
    }

    fn list_packets(&self, input: &Path) -> Result<PacketListing> {
        let mut cmd = self.command();
        cmd.args(["--batch", "--list-only", "--list-packets"])
            .arg(input);

        let out = self.run_captured("packet listing", cmd)?;
        Ok(gpg_listing::parse_packet_listing(
            &String::from_utf8_lossy(&out.stdout),
            &String::from_utf8_lossy(&out.stderr),
            out.status.success(),
        ))
    }

    fn name(&self) -> &str {
        "gpg"
    }
}
