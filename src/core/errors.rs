use std::fmt;
use std::path::PathBuf;

/// Pipeline stage that invoked the OpenPGP engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SymmetricEncrypt,
    PublicKeyEncrypt,
    PrivateKeyDecrypt,
    PassphraseDecrypt,
}

impl Stage {
    /// Known candidate causes for a failure in this stage.
    ///
    /// The engine's exit status does not tell these apart, so all of them
    /// are reported.
    pub fn likely_causes(self) -> &'static [&'static str] {
        match self {
            Stage::SymmetricEncrypt => &[
                "passphrase entry was cancelled or the passphrases did not match",
                "the engine rejected the configured cipher parameters",
                "the output directory ran out of space",
            ],
            Stage::PublicKeyEncrypt => &[
                "the recipient key cannot be used for encryption",
                "the public keyring could not be read",
            ],
            Stage::PrivateKeyDecrypt => &[
                "the matching private key is missing from your keyring",
                "the encrypted file is corrupted or truncated",
            ],
            Stage::PassphraseDecrypt => &[
                "the passphrase is wrong",
                "the intermediate data is corrupted",
            ],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SymmetricEncrypt => "Symmetric encryption",
            Stage::PublicKeyEncrypt => "Public-key encryption",
            Stage::PrivateKeyDecrypt => "Private-key decryption",
            Stage::PassphraseDecrypt => "Passphrase decryption",
        };
        f.write_str(name)
    }
}

/// Coarse classification used for reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Input validation failed before any engine stage ran.
    Precondition,
    /// The engine binary is missing.
    ExternalTool,
    /// An engine stage reported failure.
    Stage,
    /// An artifact is missing, empty or malformed.
    Integrity,
    Other,
}

/// All domain errors for doublewrap.
///
/// Each variant carries enough context to act on the failure
/// without rerunning in verbose mode.
#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists."
    )]
    FileNotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Cannot read {path}: {reason}")]
    FileUnreadable { path: PathBuf, reason: String },

    #[error(
        "Refusing to encrypt empty file: {path}\n\n  \
         An empty plaintext would decrypt to an empty file, which is\n  \
         indistinguishable from a failed decryption."
    )]
    EmptyInput { path: PathBuf },

    #[error(
        "Cannot write to directory {path}: {reason}\n\n  \
         The encrypted and intermediate files are created next to the input."
    )]
    DirectoryNotWritable { path: PathBuf, reason: String },

    #[error(
        "Invalid recipient '{identity}': {reason}\n\n  \
         Use an email address, key ID or fingerprint from 'gpg --list-keys'."
    )]
    InvalidRecipient { identity: String, reason: String },

    #[error(
        "No public key found for recipient '{identity}'\n\n  \
         Solutions:\n    \
         → Import the key: gpg --import <public-key-file>\n    \
         → Check the spelling: gpg --list-keys {identity}"
    )]
    RecipientNotFound { identity: String },

    #[error(
        "Recipient key {key_id} for '{identity}' is {validity}\n\n  \
         Encryption to unusable keys is disabled in the configuration\n  \
         (recipient_policy = \"refuse\")."
    )]
    RecipientUnusable {
        identity: String,
        key_id: String,
        validity: String,
    },

    #[error(
        "{path} was not produced by doublewrap\n\n  \
         Encrypted files are named '<file>{expected}'.\n  \
         Rename the file only if you are sure it came from 'doublewrap encrypt'."
    )]
    UnrecognizedSuffix { path: PathBuf, expected: &'static str },

    #[error(
        "OpenPGP engine not available: {program}\n\n  \
         Install GnuPG or point doublewrap at it with --gpg <path>."
    )]
    EngineUnavailable { program: String },

    #[error("gpg {operation} failed: {detail}")]
    EngineFailed {
        operation: &'static str,
        detail: String,
    },

    #[error("{stage} failed: {detail}\n\n  Possible causes:{}", format_causes(.stage))]
    StageFailed { stage: Stage, detail: String },

    #[error(
        "{path} is missing or empty although the engine reported success\n\n  \
         The output was discarded; do not rely on it."
    )]
    EmptyOutput { path: PathBuf },

    #[error(
        "{path} is not well-formed OpenPGP data: {reason}\n\n  \
         The file is corrupted or truncated and will not decrypt."
    )]
    CorruptedArtifact { path: PathBuf, reason: String },

    #[error(
        "Checksum mismatch for {path}\n\n  \
         Computed: {computed}\n  \
         Expected: {expected}\n\n  \
         The file may be corrupted or tampered with."
    )]
    ChecksumMismatch {
        path: PathBuf,
        computed: String,
        expected: String,
    },

    #[error("'{name}' not found in checksum list {list}")]
    ChecksumNotListed { name: String, list: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Audit log error: {detail}")]
    AuditError { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_causes(stage: &Stage) -> String {
    stage
        .likely_causes()
        .iter()
        .map(|c| format!("\n    → {c}"))
        .collect()
}

impl ErrorClass {
    pub fn label(self) -> &'static str {
        match self {
            ErrorClass::Precondition => "precondition",
            ErrorClass::ExternalTool => "external tool",
            ErrorClass::Stage => "engine stage",
            ErrorClass::Integrity => "integrity",
            ErrorClass::Other => "internal",
        }
    }
}

impl WrapError {
    pub fn class(&self) -> ErrorClass {
        match self {
            WrapError::FileNotFound { .. }
            | WrapError::NotAFile { .. }
            | WrapError::FileUnreadable { .. }
            | WrapError::EmptyInput { .. }
            | WrapError::DirectoryNotWritable { .. }
            | WrapError::InvalidRecipient { .. }
            | WrapError::RecipientNotFound { .. }
            | WrapError::RecipientUnusable { .. }
            | WrapError::UnrecognizedSuffix { .. }
            | WrapError::InvalidConfig { .. } => ErrorClass::Precondition,
            WrapError::EngineUnavailable { .. } => ErrorClass::ExternalTool,
            WrapError::EngineFailed { .. } | WrapError::StageFailed { .. } => ErrorClass::Stage,
            WrapError::EmptyOutput { .. }
            | WrapError::CorruptedArtifact { .. }
            | WrapError::ChecksumMismatch { .. }
            | WrapError::ChecksumNotListed { .. } => ErrorClass::Integrity,
            WrapError::AuditError { .. } | WrapError::Io(_) => ErrorClass::Other,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failure_lists_every_cause() {
        let err = WrapError::StageFailed {
            stage: Stage::PrivateKeyDecrypt,
            detail: "gpg exited with status 2".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Private-key decryption failed"));
        assert!(msg.contains("private key is missing"));
        assert!(msg.contains("corrupted or truncated"));
        assert_eq!(err.class(), ErrorClass::Stage);
    }

    #[test]
    fn suffix_error_is_a_precondition() {
        let err = WrapError::UnrecognizedSuffix {
            path: PathBuf::from("notes.txt"),
            expected: ".asymmetric.gpg",
        };
        assert_eq!(err.class(), ErrorClass::Precondition);
        assert!(err.to_string().contains("not produced by doublewrap"));
    }
}
