use std::path::Path;

use crate::cli::commands::audit_helpers::{self, display_name};
use crate::cli::context::RunContext;
use crate::cli::output;
use crate::core::errors::{Result, WrapError};
use crate::core::models::audit_entry::AuditAction;
use crate::core::services::checksum_service::{self, ChecksumAlgorithm};

/// Execute the `doublewrap checksum` command.
///
/// Without `expected` or `sums`, prints `<hex>  <file>`. Otherwise the
/// digest is compared and a mismatch is an error.
pub fn execute(
    ctx: &RunContext,
    file: &Path,
    algorithm: ChecksumAlgorithm,
    expected: Option<&str>,
    sums: Option<&Path>,
) -> Result<()> {
    let result = run(file, algorithm, expected, sums);

    let (outcome, detail) = audit_helpers::outcome_of(&result);
    audit_helpers::log_audit(
        ctx,
        AuditAction::Checksum,
        vec![display_name(file)],
        outcome,
        detail,
        state_hash(&result, file, algorithm),
    );

    let (digest, checked) = result?;
    if checked {
        output::success(&format!("Checksum matches: {digest}"));
    } else {
        println!("{digest}  {}", file.display());
    }
    Ok(())
}

/// Returns the digest and whether it was compared against anything.
fn run(
    file: &Path,
    algorithm: ChecksumAlgorithm,
    expected: Option<&str>,
    sums: Option<&Path>,
) -> Result<(String, bool)> {
    let expected = match (expected, sums) {
        (Some(hex), _) => Some(hex.to_string()),
        (None, Some(list)) => Some(expected_from_list(file, list)?),
        (None, None) => None,
    };

    if let Some(hex) = &expected
        && hex.trim().len() != algorithm.hex_len()
    {
        output::warning(&format!(
            "Expected digest has {} characters; {} digests have {}",
            hex.trim().len(),
            algorithm_name(algorithm),
            algorithm.hex_len()
        ));
    }

    let sp = output::spinner(&format!("Hashing {}...", file.display()));
    let result = match &expected {
        Some(hex) => checksum_service::verify(file, algorithm, hex),
        None => checksum_service::file_digest(file, algorithm),
    };
    sp.finish_and_clear();

    Ok((result?, expected.is_some()))
}

fn algorithm_name(algorithm: ChecksumAlgorithm) -> &'static str {
    match algorithm {
        ChecksumAlgorithm::Sha256 => "SHA-256",
        ChecksumAlgorithm::Sha512 => "SHA-512",
    }
}

/// The audit log always records SHA-256; reuse the digest when it is one.
fn state_hash(
    result: &Result<(String, bool)>,
    file: &Path,
    algorithm: ChecksumAlgorithm,
) -> Option<String> {
    match (result, algorithm) {
        (Ok((digest, _)), ChecksumAlgorithm::Sha256) => Some(digest.clone()),
        (Ok(_), ChecksumAlgorithm::Sha512) => audit_helpers::compute_file_hash(file),
        (Err(_), _) => None,
    }
}

fn expected_from_list(file: &Path, list: &Path) -> Result<String> {
    let content = std::fs::read_to_string(list).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WrapError::FileNotFound {
            path: list.to_path_buf(),
        },
        _ => WrapError::FileUnreadable {
            path: list.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    checksum_service::lookup_expected(&content, &name).ok_or(WrapError::ChecksumNotListed {
        name,
        list: list.to_path_buf(),
    })
}
