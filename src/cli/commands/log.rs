use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;

use crate::cli::context::RunContext;
use crate::cli::output;
use crate::core::errors::{Result, WrapError};
use crate::core::models::audit_entry::{AuditAction, AuditEntry, AuditOutcome};
use crate::core::traits::audit::AuditLogger;

/// Execute the `doublewrap log` command.
///
/// Displays the audit log with optional filters for date and entry count.
pub fn execute(ctx: &RunContext, since: Option<&str>, last: Option<usize>) -> Result<()> {
    let Some(logger) = ctx.audit_logger() else {
        output::warning("Audit logging is disabled in the configuration");
        return Ok(());
    };

    let since_dt = since.map(parse_since).transpose()?;
    let entries = logger.query(since_dt)?;

    if entries.is_empty() {
        output::header("doublewrap log");
        output::warning("No audit entries found");
        if since.is_some() {
            println!("  Try removing --since to see all entries.");
        }
        return Ok(());
    }

    let skip = last.map_or(0, |n| entries.len().saturating_sub(n));
    let display = &entries[skip..];

    output::header(&format!("doublewrap log ({} entries)", display.len()));
    output::detail(&format!("Log file: {}", logger.path().display()));
    println!();

    for entry in display {
        print_entry(entry);
    }

    Ok(())
}

/// Parse a date string (ISO 8601: `YYYY-MM-DD`) into a UTC DateTime.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| WrapError::InvalidConfig {
        detail: format!(
            "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
        ),
    })?;
    Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Print a single audit entry as a formatted row.
fn print_entry(entry: &AuditEntry) {
    let date = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let files = if entry.files.is_empty() {
        "-".dimmed().to_string()
    } else {
        entry.files.join(", ")
    };
    let detail = entry.detail.as_deref().unwrap_or("").dimmed().to_string();

    println!(
        "  {} {} {:<10} {:<9} {} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        format_action(&entry.action),
        format_outcome(&entry.outcome),
        entry.user.dimmed(),
        files,
        detail,
    );
}

fn format_action(action: &AuditAction) -> String {
    match action {
        AuditAction::Encrypt => "encrypt".green().to_string(),
        AuditAction::Decrypt => "decrypt".blue().to_string(),
        AuditAction::Verify => "verify".yellow().to_string(),
        AuditAction::Checksum => "checksum".cyan().to_string(),
    }
}

fn format_outcome(outcome: &AuditOutcome) -> String {
    match outcome {
        AuditOutcome::Success => "ok".green().to_string(),
        AuditOutcome::Failure => "failed".red().to_string(),
        AuditOutcome::Declined => "declined".dimmed().to_string(),
    }
}
