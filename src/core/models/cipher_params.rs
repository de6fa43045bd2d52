use crate::core::errors::{Result, WrapError};

/// OpenPGP S2K mode 3: iterated and salted.
pub const S2K_MODE_ITERATED_SALTED: u8 = 3;

/// Smallest and largest iteration counts GnuPG accepts for `--s2k-count`.
pub const MIN_KDF_ITERATIONS: u32 = 1024;
pub const MAX_KDF_ITERATIONS: u32 = 65_011_712;

const CIPHER_ALGOS: &[&str] = &[
    "AES", "AES128", "AES192", "AES256", "TWOFISH", "CAMELLIA128", "CAMELLIA192", "CAMELLIA256",
];
const DIGEST_ALGOS: &[&str] = &["SHA256", "SHA384", "SHA512", "SHA224"];
// Compression stays on; "UNCOMPRESSED" and "NONE" are not offered.
const COMPRESS_ALGOS: &[&str] = &["ZIP", "ZLIB", "BZIP2"];

/// Algorithm parameters handed to the engine for both layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub cipher_algo: String,
    pub digest_algo: String,
    pub compress_algo: String,
    pub kdf_iterations: u32,
}

impl Default for CipherParams {
    fn default() -> Self {
        Self {
            cipher_algo: "AES256".into(),
            digest_algo: "SHA512".into(),
            compress_algo: "ZLIB".into(),
            kdf_iterations: MAX_KDF_ITERATIONS,
        }
    }
}

impl CipherParams {
    /// Normalize algorithm names to upper case and reject anything the
    /// engine would not understand.
    pub fn validated(mut self) -> Result<Self> {
        self.cipher_algo = check_name("cipher_algo", &self.cipher_algo, CIPHER_ALGOS)?;
        self.digest_algo = check_name("digest_algo", &self.digest_algo, DIGEST_ALGOS)?;
        self.compress_algo = check_name("compress_algo", &self.compress_algo, COMPRESS_ALGOS)?;

        if !(MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS).contains(&self.kdf_iterations) {
            return Err(WrapError::InvalidConfig {
                detail: format!(
                    "kdf_iterations must be between {MIN_KDF_ITERATIONS} and {MAX_KDF_ITERATIONS}, got {}",
                    self.kdf_iterations
                ),
            });
        }

        Ok(self)
    }
}

fn check_name(field: &str, value: &str, allowed: &[&str]) -> Result<String> {
    let upper = value.trim().to_uppercase();
    if allowed.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(WrapError::InvalidConfig {
            detail: format!(
                "unsupported {field} '{value}'. Expected one of: {}",
                allowed.join(", ")
            ),
        })
    }
}

/// Which recipient keys may be encrypted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipientPolicy {
    /// Revoked or expired keys produce a warning and encryption proceeds.
    #[default]
    Warn,
    /// Revoked or expired keys abort the operation.
    Refuse,
}

/// What happens to temporary and partial files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// Overwrite passes before a scratch file is unlinked.
    pub wipe_passes: u32,
    /// Delete the staged output of a failed operation instead of keeping
    /// it beside the destination. The destination itself is never touched
    /// by a failure.
    pub remove_partial_output: bool,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            wipe_passes: 3,
            remove_partial_output: true,
        }
    }
}

/// Everything `TwoLayerCipher` needs to know besides its engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwoLayerConfig {
    pub params: CipherParams,
    pub cleanup: CleanupPolicy,
    pub recipient_policy: RecipientPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strong() {
        let params = CipherParams::default();
        assert_eq!(params.cipher_algo, "AES256");
        assert_eq!(params.digest_algo, "SHA512");
        assert_eq!(params.kdf_iterations, MAX_KDF_ITERATIONS);
        assert!(params.validated().is_ok());
    }

    #[test]
    fn names_are_normalized() {
        let params = CipherParams {
            cipher_algo: "camellia256".into(),
            digest_algo: " sha384".into(),
            compress_algo: "bzip2".into(),
            kdf_iterations: 2048,
        }
        .validated()
        .unwrap();
        assert_eq!(params.cipher_algo, "CAMELLIA256");
        assert_eq!(params.digest_algo, "SHA384");
        assert_eq!(params.compress_algo, "BZIP2");
    }

    #[test]
    fn weak_cipher_rejected() {
        let params = CipherParams {
            cipher_algo: "3DES".into(),
            ..CipherParams::default()
        };
        let err = params.validated().unwrap_err();
        assert!(err.to_string().contains("unsupported cipher_algo"));
    }

    #[test]
    fn disabling_compression_rejected() {
        for name in ["uncompressed", "none"] {
            let params = CipherParams {
                compress_algo: name.into(),
                ..CipherParams::default()
            };
            let err = params.validated().unwrap_err();
            assert!(err.to_string().contains("unsupported compress_algo"));
        }
    }

    #[test]
    fn iteration_count_out_of_range_rejected() {
        let params = CipherParams {
            kdf_iterations: 10,
            ..CipherParams::default()
        };
        assert!(params.validated().is_err());
    }
}
