use std::path::Path;

use crate::core::errors::Result;

/// Port for talking to whoever runs an operation.
///
/// The terminal implementation lives in `cli::prompt`; tests script it.
pub trait Interaction {
    /// Ask whether an existing `path` may be overwritten.
    fn confirm_overwrite(&self, path: &Path) -> Result<bool>;

    /// Report a condition that does not stop the operation.
    fn warn(&self, message: &str);

    /// Announce the pipeline stage about to run.
    fn stage(&self, message: &str);
}
