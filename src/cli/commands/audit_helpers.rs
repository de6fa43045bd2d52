use std::path::Path;

use chrono::Utc;

use crate::cli::context::RunContext;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::{AuditAction, AuditEntry, AuditOutcome};
use crate::core::services::checksum_service::{self, ChecksumAlgorithm};
use crate::core::traits::audit::AuditLogger;

/// Login name of whoever runs doublewrap, `"unknown"` if the environment
/// does not say.
pub fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// SHA-256 of a produced artifact. Returns `None` if it cannot be read.
pub fn compute_file_hash(path: &Path) -> Option<String> {
    checksum_service::file_digest(path, ChecksumAlgorithm::Sha256).ok()
}

/// Map a command result to its audit outcome and detail text.
pub fn outcome_of<T>(result: &Result<T>) -> (AuditOutcome, Option<String>) {
    match result {
        Ok(_) => (AuditOutcome::Success, None),
        Err(e) => (
            AuditOutcome::Failure,
            e.to_string().lines().next().map(str::to_string),
        ),
    }
}

/// Record an audit event. Warns on failure instead of propagating
/// the error, since audit should not block the main operation.
pub fn log_audit(
    ctx: &RunContext,
    action: AuditAction,
    files: Vec<String>,
    outcome: AuditOutcome,
    detail: Option<String>,
    state_hash: Option<String>,
) {
    let Some(logger) = ctx.audit_logger() else {
        return;
    };

    let entry = AuditEntry {
        timestamp: Utc::now(),
        user: current_user(),
        action,
        files,
        outcome,
        detail,
        state_hash,
    };

    if let Err(e) = logger.log_event(&entry) {
        output::warning(&format!("Could not write audit log: {e}"));
    }
}

pub fn display_name(path: &Path) -> String {
    path.display().to_string()
}
