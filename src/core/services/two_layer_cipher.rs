use std::fs::File;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, Stage, WrapError};
use crate::core::models::artifact;
use crate::core::models::cipher_params::{RecipientPolicy, TwoLayerConfig};
use crate::core::models::key_info::{KeyInfo, KeyValidity};
use crate::core::models::report::{DecryptReport, EncryptReport, Outcome};
use crate::core::services::scratch::{Disposal, ScratchFile};
use crate::core::services::wipe::WipeOutcome;
use crate::core::traits::engine::OpenPgpEngine;
use crate::core::traits::interaction::Interaction;

const MAX_RECIPIENT_LEN: usize = 256;

/// Orchestrates the symmetric and public-key layers on top of an
/// `OpenPgpEngine`.
///
/// Encryption runs passphrase first, public key second; decryption runs
/// the inverse. The intermediate symmetric layer only ever exists as a
/// [`ScratchFile`], so it is wiped on every exit path.
pub struct TwoLayerCipher<E: OpenPgpEngine> {
    pub engine: E,
    pub config: TwoLayerConfig,
}

impl<E: OpenPgpEngine> TwoLayerCipher<E> {
    pub fn new(engine: E, config: TwoLayerConfig) -> Self {
        Self { engine, config }
    }

    /// Encrypt `input` for `recipient`, producing `<input>.asymmetric.gpg`.
    pub fn encrypt(
        &self,
        input: &Path,
        recipient: &str,
        ui: &dyn Interaction,
    ) -> Result<Outcome<EncryptReport>> {
        let input_bytes = readable_file_size(input)?;
        if input_bytes == 0 {
            return Err(WrapError::EmptyInput {
                path: input.to_path_buf(),
            });
        }
        validate_recipient(recipient)?;

        let output = artifact::encrypted_path(input);
        if output.exists() && !ui.confirm_overwrite(&output)? {
            return Ok(Outcome::Declined { output });
        }

        let scratch = ScratchFile::reserve(artifact::work_dir(&output), input, self.shred())?;
        self.ensure_engine()?;
        let key = self.resolve_recipient(recipient, ui)?;
        let params = &self.config.params;

        ui.stage(&format!(
            "Encrypting {} with {} (passphrase layer)",
            input.display(),
            params.cipher_algo
        ));
        self.engine
            .symmetric_encrypt(input, scratch.path(), params)
            .map_err(|e| stage_failure(Stage::SymmetricEncrypt, e))?;
        non_empty_size(scratch.path())?;

        // Encrypt to the key that was checked, not whatever the identity matches.
        let target = key.fingerprint.as_deref().unwrap_or(&key.key_id);
        let staged = ScratchFile::stage_output(&output, Disposal::Remove)?;
        ui.stage(&format!("Encrypting to {key} (public-key layer)"));
        let written = self
            .engine
            .public_key_encrypt(scratch.path(), staged.path(), target, params)
            .map_err(|e| stage_failure(Stage::PublicKeyEncrypt, e))
            .and_then(|()| staged_size(staged.path(), &output));
        let output_bytes = self.install_output(staged, &output, written, ui)?;
        report_wipe(scratch, ui);

        Ok(Outcome::Completed(EncryptReport {
            output,
            input_bytes,
            output_bytes,
            recipient: key,
        }))
    }

    /// Decrypt an `.asymmetric.gpg` file back to `<stem>.decrypted`.
    pub fn decrypt(&self, input: &Path, ui: &dyn Interaction) -> Result<Outcome<DecryptReport>> {
        readable_file_size(input)?;
        let output = artifact::decrypted_path(input)?;

        if output.exists() && !ui.confirm_overwrite(&output)? {
            return Ok(Outcome::Declined { output });
        }

        let scratch = ScratchFile::reserve(artifact::work_dir(&output), input, self.shred())?;
        self.ensure_engine()?;

        ui.stage(&format!("Decrypting {} (private-key layer)", input.display()));
        self.engine
            .decrypt(input, scratch.path())
            .map_err(|e| stage_failure(Stage::PrivateKeyDecrypt, e))?;
        non_empty_size(scratch.path())?;

        // Recovered plaintext is wiped, not just unlinked, if anything fails.
        let staged = ScratchFile::stage_output(&output, self.shred())?;
        ui.stage("Decrypting passphrase layer");
        let written = self
            .engine
            .decrypt(scratch.path(), staged.path())
            .map_err(|e| stage_failure(Stage::PassphraseDecrypt, e))
            .and_then(|()| staged_size(staged.path(), &output));
        let output_bytes = self.install_output(staged, &output, written, ui)?;
        report_wipe(scratch, ui);

        Ok(Outcome::Completed(DecryptReport {
            output,
            output_bytes,
        }))
    }

    fn shred(&self) -> Disposal {
        Disposal::Shred {
            passes: self.config.cleanup.wipe_passes,
        }
    }

    /// Move a staged engine output over `output` once it is complete.
    ///
    /// After a failure `output` is never touched. The staged file is
    /// disposed of, or kept under its own name when partial outputs are
    /// configured to stay.
    fn install_output(
        &self,
        staged: ScratchFile,
        output: &Path,
        written: Result<u64>,
        ui: &dyn Interaction,
    ) -> Result<u64> {
        match written {
            Ok(bytes) => {
                staged.persist(output)?;
                Ok(bytes)
            }
            Err(e) => {
                if !self.config.cleanup.remove_partial_output
                    && non_empty_size(staged.path()).is_ok()
                {
                    let kept = staged.keep();
                    ui.warn(&format!("Partial output kept at {}", kept.display()));
                }
                Err(e)
            }
        }
    }

    fn ensure_engine(&self) -> Result<()> {
        if self.engine.is_available() {
            Ok(())
        } else {
            Err(WrapError::EngineUnavailable {
                program: self.engine.name().to_string(),
            })
        }
    }

    /// Look the recipient up in the keyring and apply the recipient policy.
    fn resolve_recipient(&self, recipient: &str, ui: &dyn Interaction) -> Result<KeyInfo> {
        let keys = self.engine.list_keys(recipient)?;

        let key = keys
            .iter()
            .find(|k| k.validity == KeyValidity::Valid && k.can_encrypt())
            .or_else(|| keys.iter().find(|k| !k.validity.is_compromised()))
            .or_else(|| keys.first())
            .cloned()
            .ok_or_else(|| WrapError::RecipientNotFound {
                identity: recipient.to_string(),
            })?;

        if key.validity.is_compromised() {
            match self.config.recipient_policy {
                RecipientPolicy::Refuse => {
                    return Err(WrapError::RecipientUnusable {
                        identity: recipient.to_string(),
                        key_id: key.key_id.clone(),
                        validity: key.validity.to_string(),
                    });
                }
                RecipientPolicy::Warn => ui.warn(&format!(
                    "Recipient key {} is {}; encrypting anyway",
                    key.key_id, key.validity
                )),
            }
        }

        Ok(key)
    }
}

/// Dispose of the intermediate layer now so a failed overwrite can be reported.
fn report_wipe(scratch: ScratchFile, ui: &dyn Interaction) {
    let path = scratch.path().to_path_buf();
    match scratch.dispose() {
        Ok(WipeOutcome::Shredded | WipeOutcome::Missing) => {}
        Ok(WipeOutcome::Removed) => ui.warn(&format!(
            "Could not overwrite {}; it was deleted without wiping",
            path.display()
        )),
        Err(e) => ui.warn(&format!(
            "Could not delete intermediate file {}: {e}",
            path.display()
        )),
    }
}

fn stage_failure(stage: Stage, err: WrapError) -> WrapError {
    match err {
        WrapError::EngineFailed { detail, .. } => WrapError::StageFailed { stage, detail },
        WrapError::EngineUnavailable { .. } => err,
        other => WrapError::StageFailed {
            stage,
            detail: other.to_string(),
        },
    }
}

/// Size of `path`, after checking it is an existing, readable regular file.
pub(crate) fn readable_file_size(path: &Path) -> Result<u64> {
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WrapError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => WrapError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    if !meta.is_file() {
        return Err(WrapError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    File::open(path).map_err(|e| WrapError::FileUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(meta.len())
}

/// Size of an engine output, failing when it is missing or empty.
fn non_empty_size(path: &Path) -> Result<u64> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => Ok(meta.len()),
        _ => Err(WrapError::EmptyOutput {
            path: PathBuf::from(path),
        }),
    }
}

/// Like [`non_empty_size`], but reports the final output path.
fn staged_size(staged: &Path, output: &Path) -> Result<u64> {
    non_empty_size(staged).map_err(|_| WrapError::EmptyOutput {
        path: output.to_path_buf(),
    })
}

fn validate_recipient(identity: &str) -> Result<()> {
    let invalid = |reason: &str| WrapError::InvalidRecipient {
        identity: identity.to_string(),
        reason: reason.to_string(),
    };

    if identity.trim().is_empty() {
        return Err(invalid("identity is empty"));
    }
    if identity.len() > MAX_RECIPIENT_LEN {
        return Err(invalid("identity is too long"));
    }
    if identity.starts_with('-') {
        return Err(invalid("identity must not start with '-'"));
    }
    if identity.chars().any(char::is_control) {
        return Err(invalid("identity contains control characters"));
    }
    Ok(())
}
