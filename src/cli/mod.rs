pub mod commands;
pub mod context;
pub mod interrupt;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::services::checksum_service::ChecksumAlgorithm;

/// Two-layer file encryption: a passphrase layer wrapped in a public-key layer.
#[derive(Parser, Debug)]
#[command(name = "doublewrap", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Overwrite existing outputs without asking
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// gpg binary to run
    #[arg(long, global = true, env = "DOUBLEWRAP_GPG")]
    pub gpg: Option<PathBuf>,

    /// GnuPG home directory (keyrings)
    #[arg(long, global = true, env = "DOUBLEWRAP_GNUPGHOME")]
    pub homedir: Option<PathBuf>,

    /// Path to alternative config file
    #[arg(long, global = true, env = "DOUBLEWRAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt a file with a passphrase, then to a recipient's public key
    Encrypt {
        /// File to encrypt
        input_file: PathBuf,
        /// Recipient email, key ID or fingerprint
        recipient: String,
    },

    /// Decrypt a file produced by `encrypt`
    Decrypt {
        /// File ending in .asymmetric.gpg
        encrypted_file: PathBuf,
    },

    /// Check that an encrypted file is well-formed OpenPGP data
    Verify {
        /// File to check
        encrypted_file: PathBuf,
    },

    /// Print or verify a file's checksum
    Checksum {
        /// File to hash
        file: PathBuf,
        /// Hash algorithm
        #[arg(long, value_enum, default_value_t = ChecksumAlgorithm::Sha256)]
        algorithm: ChecksumAlgorithm,
        /// Expected hex digest
        #[arg(long, conflicts_with = "sums")]
        expected: Option<String>,
        /// Checksum list in `<hex>  <name>` format
        #[arg(long)]
        sums: Option<PathBuf>,
    },

    /// Show operation history
    Log {
        /// Filter entries since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}
