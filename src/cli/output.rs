use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

const QUIET: u8 = 0;
const NORMAL: u8 = 1;
const VERBOSE: u8 = 2;

static LEVEL: AtomicU8 = AtomicU8::new(NORMAL);

/// Set the verbosity for the rest of the process. `quiet` wins over `verbose`.
pub fn init(verbose: bool, quiet: bool) {
    let level = if quiet {
        QUIET
    } else if verbose {
        VERBOSE
    } else {
        NORMAL
    };
    LEVEL.store(level, Ordering::Relaxed);
}

fn level() -> u8 {
    LEVEL.load(Ordering::Relaxed)
}

/// Print a success message.
pub fn success(msg: &str) {
    if level() >= NORMAL {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message. Shown even in quiet mode.
pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if level() >= NORMAL {
        println!("\n{}", msg.bold());
    }
}

/// Print a progress line for a step that is about to run.
pub fn step(msg: &str) {
    if level() >= NORMAL {
        println!("  {} {}", "→".cyan(), msg);
    }
}

/// Print extra detail, only with `--verbose`.
pub fn detail(msg: &str) {
    if level() >= VERBOSE {
        println!("    {}", msg.dimmed());
    }
}

/// Start a spinner for a non-interactive step. Hidden in quiet mode.
pub fn spinner(msg: &str) -> ProgressBar {
    if level() == QUIET {
        return ProgressBar::hidden();
    }

    let sp = ProgressBar::new_spinner();
    sp.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    sp.set_message(msg.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    sp
}

/// Stop a spinner and replace it with a success line.
pub fn finish_spinner(sp: ProgressBar, msg: &str) {
    sp.finish_and_clear();
    success(msg);
}

/// Format a byte count for humans.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
