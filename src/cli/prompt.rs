use std::io::{self, BufRead, Write};
use std::path::Path;

use indicatif::ProgressBar;

use crate::cli::output;
use crate::core::errors::Result;
use crate::core::traits::interaction::Interaction;

/// `Interaction` backed by the controlling terminal.
pub struct TerminalInteraction {
    assume_yes: bool,
    progress: Option<ProgressBar>,
}

impl TerminalInteraction {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            progress: None,
        }
    }

    /// Clear `bar` from the terminal while a message or prompt is printed.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    fn suspended<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.progress {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl Interaction for TerminalInteraction {
    fn confirm_overwrite(&self, path: &Path) -> Result<bool> {
        if self.assume_yes {
            output::detail(&format!("Overwriting {} (--yes)", path.display()));
            return Ok(true);
        }

        self.suspended(|| -> Result<bool> {
            print!("  {} already exists. Overwrite? [y/N]: ", path.display());
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;
            Ok(is_yes(&input))
        })
    }

    fn warn(&self, message: &str) {
        self.suspended(|| output::warning(message));
    }

    fn stage(&self, message: &str) {
        self.suspended(|| output::step(message));
    }
}

/// Only an explicit yes counts; empty input and EOF mean no.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
