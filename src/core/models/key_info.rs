use std::fmt;

/// Validity of a public key as reported by the engine's keyring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValidity {
    Valid,
    Revoked,
    Expired,
    Disabled,
    Invalid,
    /// Unknown or undefined trust; the key itself is usable.
    Unknown,
}

impl KeyValidity {
    /// Keys in these states may not represent a trustworthy endpoint.
    pub fn is_compromised(self) -> bool {
        matches!(
            self,
            KeyValidity::Revoked | KeyValidity::Expired | KeyValidity::Disabled | KeyValidity::Invalid
        )
    }
}

impl fmt::Display for KeyValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyValidity::Valid => "valid",
            KeyValidity::Revoked => "revoked",
            KeyValidity::Expired => "expired",
            KeyValidity::Disabled => "disabled",
            KeyValidity::Invalid => "invalid",
            KeyValidity::Unknown => "of unknown validity",
        };
        f.write_str(s)
    }
}

/// A public key found in the engine's keyring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key_id: String,
    pub fingerprint: Option<String>,
    pub user_ids: Vec<String>,
    pub validity: KeyValidity,
    /// Key capability letters, e.g. `scESC`.
    pub capabilities: String,
}

impl KeyInfo {
    /// Whether the key or one of its subkeys can encrypt.
    ///
    /// An empty capability field means the engine did not say, which is
    /// treated as capable.
    pub fn can_encrypt(&self) -> bool {
        self.capabilities.is_empty() || self.capabilities.contains('E')
    }
}

impl fmt::Display for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user_ids.first() {
            Some(uid) => write!(f, "{} ({})", self.key_id, uid),
            None => write!(f, "{}", self.key_id),
        }
    }
}
