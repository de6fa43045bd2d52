use std::path::Path;

use crate::core::errors::{Result, WrapError};
use crate::core::models::artifact;
use crate::core::models::report::ProbeReport;
use crate::core::services::two_layer_cipher::readable_file_size;
use crate::core::traits::engine::OpenPgpEngine;
use crate::core::traits::interaction::Interaction;

/// Structural check of an encrypted file; needs no key material.
///
/// Advisory only: a well-formed file can still fail to decrypt with the
/// wrong key or passphrase.
pub struct IntegrityProbe<E: OpenPgpEngine> {
    pub engine: E,
}

impl<E: OpenPgpEngine> IntegrityProbe<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn probe(&self, path: &Path, ui: &dyn Interaction) -> Result<ProbeReport> {
        let size = readable_file_size(path)?;

        if !artifact::has_encrypted_suffix(path) {
            ui.warn(&format!(
                "{} does not end in {}; checking it anyway",
                path.display(),
                artifact::ENCRYPTED_SUFFIX
            ));
        }

        if size == 0 {
            return Err(WrapError::CorruptedArtifact {
                path: path.to_path_buf(),
                reason: "file is empty".into(),
            });
        }

        if !self.engine.is_available() {
            return Err(WrapError::EngineUnavailable {
                program: self.engine.name().to_string(),
            });
        }

        let listing = self.engine.list_packets(path)?;
        if !listing.is_well_formed() {
            let reason = listing
                .fatal_diagnostic()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    if listing.packets.is_empty() {
                        "no OpenPGP packets found".to_string()
                    } else {
                        "the engine rejected the packet stream".to_string()
                    }
                });
            return Err(WrapError::CorruptedArtifact {
                path: path.to_path_buf(),
                reason,
            });
        }

        Ok(ProbeReport {
            path: path.to_path_buf(),
            session_key_packets: listing.session_key_packets(),
            packets: listing.packets,
        })
    }
}
