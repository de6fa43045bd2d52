use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, WrapError};
use crate::core::models::cipher_params::{
    CipherParams, CleanupPolicy, RecipientPolicy, TwoLayerConfig,
};

const MAX_WIPE_PASSES: u32 = 35;

/// Top-level configuration read from `config.toml`.
///
/// Every section and field is optional; missing values fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineSection,
    pub cipher: CipherSection,
    pub cleanup: CleanupSection,
    pub recipients: RecipientsSection,
    pub audit: AuditSection,
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the per-user default
    /// location is read when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(WrapError::InvalidConfig {
                        detail: format!("config file {} not found", p.display()),
                    });
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| match e {
            WrapError::InvalidConfig { detail } => WrapError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| WrapError::InvalidConfig {
            detail: format!("failed to parse config: {e}"),
        })?;
        config.two_layer()?;
        Ok(config)
    }

    /// `<config dir>/doublewrap/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("doublewrap").join("config.toml"))
    }

    /// Validated settings for `TwoLayerCipher`.
    pub fn two_layer(&self) -> Result<TwoLayerConfig> {
        let params = CipherParams {
            cipher_algo: self.cipher.cipher_algo.clone(),
            digest_algo: self.cipher.digest_algo.clone(),
            compress_algo: self.cipher.compress_algo.clone(),
            kdf_iterations: self.cipher.kdf_iterations,
        }
        .validated()?;

        if !(1..=MAX_WIPE_PASSES).contains(&self.cleanup.wipe_passes) {
            return Err(WrapError::InvalidConfig {
                detail: format!(
                    "wipe_passes must be between 1 and {MAX_WIPE_PASSES}, got {}",
                    self.cleanup.wipe_passes
                ),
            });
        }

        Ok(TwoLayerConfig {
            params,
            cleanup: CleanupPolicy {
                wipe_passes: self.cleanup.wipe_passes,
                remove_partial_output: self.cleanup.remove_partial_output,
            },
            recipient_policy: self.recipients.policy.into(),
        })
    }
}

/// The `[engine]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// gpg binary; looked up on PATH when absent.
    pub gpg_path: Option<PathBuf>,
    /// Alternative GnuPG home directory.
    pub homedir: Option<PathBuf>,
}

/// The `[cipher]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CipherSection {
    pub cipher_algo: String,
    pub digest_algo: String,
    pub compress_algo: String,
    pub kdf_iterations: u32,
}

impl Default for CipherSection {
    fn default() -> Self {
        let params = CipherParams::default();
        Self {
            cipher_algo: params.cipher_algo,
            digest_algo: params.digest_algo,
            compress_algo: params.compress_algo,
            kdf_iterations: params.kdf_iterations,
        }
    }
}

/// The `[cleanup]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupSection {
    pub wipe_passes: u32,
    pub remove_partial_output: bool,
}

impl Default for CleanupSection {
    fn default() -> Self {
        let policy = CleanupPolicy::default();
        Self {
            wipe_passes: policy.wipe_passes,
            remove_partial_output: policy.remove_partial_output,
        }
    }
}

/// The `[recipients]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipientsSection {
    pub policy: PolicyName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyName {
    #[default]
    Warn,
    Refuse,
}

impl From<PolicyName> for RecipientPolicy {
    fn from(name: PolicyName) -> Self {
        match name {
            PolicyName::Warn => RecipientPolicy::Warn,
            PolicyName::Refuse => RecipientPolicy::Refuse,
        }
    }
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditSection {
    pub enabled: bool,
    /// Log file; defaults to the per-user data directory.
    pub log_file: Option<PathBuf>,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: None,
        }
    }
}
