use std::path::Path;

use crate::cli::commands::audit_helpers::{self, display_name};
use crate::cli::context::RunContext;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::audit_entry::AuditAction;
use crate::core::services::integrity_probe::IntegrityProbe;

/// Execute the `doublewrap verify` command.
///
/// Structural check only; a pass does not prove the file will decrypt.
pub fn execute(ctx: &RunContext, path: &Path) -> Result<()> {
    output::header(&format!("doublewrap verify {}", path.display()));

    let probe = IntegrityProbe::new(ctx.engine());
    let sp = output::spinner("Listing OpenPGP packets...");
    let ui = ctx.interaction().with_progress(sp.clone());
    let result = probe.probe(path, &ui);
    sp.finish_and_clear();

    let (outcome, detail) = audit_helpers::outcome_of(&result);
    audit_helpers::log_audit(
        ctx,
        AuditAction::Verify,
        vec![display_name(path)],
        outcome,
        detail,
        audit_helpers::compute_file_hash(path),
    );

    let report = result?;
    for packet in &report.packets {
        output::detail(packet);
    }
    output::success(&format!(
        "{} is well-formed OpenPGP data ({} packet(s), {} encrypted session key(s))",
        report.path.display(),
        report.packets.len(),
        report.session_key_packets
    ));
    Ok(())
}
