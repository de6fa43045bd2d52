//! Shared fixtures for the integration tests: a stand-in `gpg` and an
//! isolated environment for every run.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::TempDir;
use assert_fs::prelude::*;

/// POSIX shell imitation of the gpg subset doublewrap drives.
///
/// Layers are plain text headers (`SYM1`, `ENC1`) prepended to the input,
/// so decryption strips one line per layer. `FAKE_GPG_FAIL` and
/// `FAKE_GPG_EMPTY` name a mode (`sym`, `enc`, `dec`) to break;
/// `FAKE_GPG_FAIL=dec-sym` fails only the passphrase layer after writing
/// some output. Every invocation is appended to `$FAKE_GPG_LOG` when set.
const FAKE_GPG: &str = r#"#!/bin/sh
[ -n "$FAKE_GPG_LOG" ] && echo "$*" >> "$FAKE_GPG_LOG"
mode=""
out=""
input=""
while [ $# -gt 0 ]; do
  case "$1" in
    --version) echo "gpg (GnuPG) 2.4.4"; exit 0 ;;
    --symmetric) mode=sym ;;
    --encrypt) mode=enc ;;
    --decrypt) mode=dec ;;
    --list-keys) mode=keys ;;
    --list-packets) mode=packets ;;
    --output) out="$2"; shift ;;
    --homedir|--recipient|--cipher-algo|--s2k-cipher-algo|--s2k-digest-algo|--s2k-mode|--s2k-count|--compress-algo|--digest-algo|--trust-model) shift ;;
    --) input="${2:-}"; break ;;
    -*) ;;
    *) input="$1" ;;
  esac
  shift
done

if [ "$FAKE_GPG_FAIL" = "$mode" ]; then
  echo "gpg: $mode failed: Operation cancelled" >&2
  exit 2
fi
if [ "$FAKE_GPG_EMPTY" = "$mode" ]; then
  : > "$out"
  exit 0
fi

case "$mode" in
  sym)
    { echo "SYM1"; cat "$input"; } > "$out" ;;
  enc)
    { echo "ENC1"; cat "$input"; } > "$out" ;;
  dec)
    header=$(head -n 1 "$input")
    if [ "$header" != "ENC1" ] && [ "$header" != "SYM1" ]; then
      echo "gpg: no valid OpenPGP data found." >&2
      exit 2
    fi
    if [ "$FAKE_GPG_FAIL" = "dec-sym" ] && [ "$header" = "SYM1" ]; then
      echo "partial" > "$out"
      echo "gpg: decryption failed: Bad session key" >&2
      exit 2
    fi
    tail -n +2 "$input" > "$out" ;;
  keys)
    case "$input" in
      alice@example.com)
        echo "pub:u:255:22:0123456789ABCDEF:1700000000:::u:::scESC:::::ed25519:::0:"
        echo "fpr:::::::::AAAABBBBCCCCDDDDEEEEFFFF0123456789ABCDEF:"
        echo "uid:u::::1700000000::4B1D::Alice <alice@example.com>::::::::::0:"
        echo "sub:u:255:18:FEDCBA9876543210:1700000000::::::e:::::cv25519::" ;;
      revoked@example.com)
        echo "pub:r:255:22:9999888877776666:1600000000:::r:::sc:::::ed25519:::0:"
        echo "uid:r::::1600000000::77AA::Old <revoked@example.com>::::::::::0:" ;;
      *)
        echo "gpg: error reading key: No public key" >&2
        exit 2 ;;
    esac ;;
  packets)
    if [ "$(head -n 1 "$input")" = "ENC1" ]; then
      echo ":pubkey enc packet: version 3, algo 18, keyid FEDCBA9876543210"
      echo ":encrypted data packet:"
    else
      echo "gpg: no valid OpenPGP data found." >&2
      exit 2
    fi ;;
  *)
    echo "gpg: unsupported invocation" >&2
    exit 2 ;;
esac
"#;

/// A temp workspace with the fake gpg installed and a private config
/// pointing the audit log inside it.
pub struct Sandbox {
    pub dir: TempDir,
    pub gpg: PathBuf,
    pub log: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let gpg = dir.child("bin/gpg");
        gpg.write_str(FAKE_GPG).unwrap();
        std::fs::set_permissions(gpg.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        dir.child("work").create_dir_all().unwrap();
        let audit_log = dir.path().join("data/doublewrap/audit.log");
        dir.child("config.toml")
            .write_str(&format!(
                "[audit]\nlog_file = {:?}\n",
                audit_log.display().to_string()
            ))
            .unwrap();

        Self {
            gpg: gpg.path().to_path_buf(),
            log: dir.path().join("gpg-calls.log"),
            dir,
        }
    }

    /// Directory the tests treat as the user's working directory.
    pub fn work(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn write(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.work().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn audit_log(&self) -> PathBuf {
        self.dir.path().join("data/doublewrap/audit.log")
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// `doublewrap` running in `work()` against the fake gpg.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("doublewrap");
        cmd.current_dir(self.work())
            .env("DOUBLEWRAP_GPG", &self.gpg)
            .env("FAKE_GPG_LOG", &self.log)
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("DOUBLEWRAP_CONFIG", self.config())
            .env_remove("DOUBLEWRAP_GNUPGHOME")
            .env_remove("FAKE_GPG_FAIL")
            .env_remove("FAKE_GPG_EMPTY");
        cmd
    }

    /// Invocations the fake gpg received, excluding `--version` probes.
    pub fn gpg_calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .filter(|l| !l.contains("--version"))
            .map(str::to_string)
            .collect()
    }

    /// Intermediate passphrase-layer files left anywhere in `work()`.
    pub fn scratch_files(&self) -> Vec<PathBuf> {
        leftovers(&self.work())
    }
}

fn leftovers(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".symmetric.gpg") || n.ends_with(".partial"))
        })
        .collect()
}
