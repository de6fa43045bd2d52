use serde::{Deserialize, Serialize};

/// Actions that get recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Encrypt,
    Decrypt,
    Verify,
    Checksum,
}

/// How an audited operation ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
    /// The user declined to overwrite an existing output.
    Declined,
}

/// A single entry in the audit log (JSON lines format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub user: String,
    pub action: AuditAction,
    pub files: Vec<String>,
    pub outcome: AuditOutcome,
    pub detail: Option<String>,
    pub state_hash: Option<String>,
}
