use std::path::Path;

use crate::cli::commands::audit_helpers::{self, display_name};
use crate::cli::context::RunContext;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::{AuditAction, AuditOutcome};
use crate::core::models::report::{EncryptReport, Outcome};
use crate::core::services::two_layer_cipher::TwoLayerCipher;

/// Execute the `doublewrap encrypt` command.
///
/// Wraps `input` in a passphrase layer and then in a public-key layer for
/// `recipient`, writing `<input>.asymmetric.gpg` next to it.
pub fn execute(ctx: &RunContext, input: &Path, recipient: &str) -> Result<()> {
    let result = run(ctx, input, recipient);

    let (outcome, detail, state_hash) = match &result {
        Ok(Outcome::Completed(report)) => (
            AuditOutcome::Success,
            Some(format!("encrypted for {}", report.recipient.key_id)),
            audit_helpers::compute_file_hash(&report.output),
        ),
        Ok(Outcome::Declined { .. }) => (AuditOutcome::Declined, None, None),
        Err(_) => {
            let (outcome, detail) = audit_helpers::outcome_of(&result);
            (outcome, detail, None)
        }
    };
    audit_helpers::log_audit(
        ctx,
        AuditAction::Encrypt,
        vec![display_name(input)],
        outcome,
        detail,
        state_hash,
    );

    match result? {
        Outcome::Completed(report) => print_report(&report),
        Outcome::Declined { output } => {
            output::warning(&format!("Kept existing {}; nothing encrypted", output.display()));
        }
    }
    Ok(())
}

fn run(ctx: &RunContext, input: &Path, recipient: &str) -> Result<Outcome<EncryptReport>> {
    let cipher = TwoLayerCipher::new(ctx.engine(), ctx.two_layer_config()?);
    let params = &cipher.config.params;
    output::header(&format!("doublewrap encrypt {}", input.display()));
    output::detail(&format!(
        "Cipher: {}, digest: {}, compression: {}, KDF iterations: {}",
        params.cipher_algo, params.digest_algo, params.compress_algo, params.kdf_iterations
    ));

    cipher.encrypt(input, recipient, &ctx.interaction())
}

fn print_report(report: &EncryptReport) {
    let key = &report.recipient;
    output::detail(&format!(
        "Recipient key: {} ({})",
        key.fingerprint.as_deref().unwrap_or(&key.key_id),
        key.user_ids.first().map_or("no user ID", String::as_str)
    ));
    output::success(&format!(
        "Encrypted {} → {} ({})",
        output::human_bytes(report.input_bytes),
        report.output.display(),
        output::human_bytes(report.output_bytes)
    ));
    output::success("Temporary passphrase layer wiped");
}
