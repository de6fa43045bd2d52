use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::cipher_params::CipherParams;
use crate::core::models::key_info::KeyInfo;
use crate::core::models::packet_listing::PacketListing;

/// Port for the external OpenPGP engine.
///
/// Implementations live in `adapters::engine` (e.g. `GpgEngine`).
/// The core layer only depends on this trait, never on a concrete
/// tool's command syntax. Every call blocks until the engine finishes.
pub trait OpenPgpEngine: Send + Sync {
    /// Whether the engine can be invoked at all.
    fn is_available(&self) -> bool;

    /// Encrypt `input` with a passphrase the engine asks for, writing `output`.
    fn symmetric_encrypt(&self, input: &Path, output: &Path, params: &CipherParams) -> Result<()>;

    /// Encrypt `input` to `recipient`'s public key, writing `output`.
    fn public_key_encrypt(
        &self,
        input: &Path,
        output: &Path,
        recipient: &str,
        params: &CipherParams,
    ) -> Result<()>;

    /// Decrypt `input` into `output`. The engine picks the private-key or
    /// passphrase path from the packets it finds.
    fn decrypt(&self, input: &Path, output: &Path) -> Result<()>;

    /// Public keys matching `identity`. Empty when none match.
    fn list_keys(&self, identity: &str) -> Result<Vec<KeyInfo>>;

    /// Structural listing of `input` without decrypting it.
    fn list_packets(&self, input: &Path) -> Result<PacketListing>;

    /// Human-readable name of the engine program.
    fn name(&self) -> &str;
}
