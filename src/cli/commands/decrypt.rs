use std::path::Path;

use crate::cli::commands::audit_helpers::{self, display_name};
use crate::cli::context::RunContext;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::{AuditAction, AuditOutcome};
use crate::core::models::report::{DecryptReport, Outcome};
use crate::core::services::two_layer_cipher::TwoLayerCipher;

/// Execute the `doublewrap decrypt` command.
///
/// Removes the public-key layer with the private key from the keyring,
/// then the passphrase layer, writing `<stem>.decrypted`.
pub fn execute(ctx: &RunContext, input: &Path) -> Result<()> {
    let result = run(ctx, input);

    let (outcome, detail) = match &result {
        Ok(Outcome::Completed(report)) => (
            AuditOutcome::Success,
            Some(format!("wrote {}", report.output.display())),
        ),
        Ok(Outcome::Declined { .. }) => (AuditOutcome::Declined, None),
        Err(_) => audit_helpers::outcome_of(&result),
    };
    // No state hash: neither the plaintext nor its source is fingerprinted.
    audit_helpers::log_audit(
        ctx,
        AuditAction::Decrypt,
        vec![display_name(input)],
        outcome,
        detail,
        None,
    );

    match result? {
        Outcome::Completed(report) => {
            output::success(&format!(
                "Decrypted to {} ({})",
                report.output.display(),
                output::human_bytes(report.output_bytes)
            ));
            output::success("Temporary passphrase layer wiped");
        }
        Outcome::Declined { output } => {
            output::warning(&format!("Kept existing {}; nothing decrypted", output.display()));
        }
    }
    Ok(())
}

fn run(ctx: &RunContext, input: &Path) -> Result<Outcome<DecryptReport>> {
    let cipher = TwoLayerCipher::new(ctx.engine(), ctx.two_layer_config()?);
    output::header(&format!("doublewrap decrypt {}", input.display()));
    cipher.decrypt(input, &ctx.interaction())
}
