use std::path::PathBuf;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::adapters::engine::gpg_engine::GpgEngine;
use crate::cli::output;
use crate::cli::prompt::TerminalInteraction;
use crate::cli::Cli;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::cipher_params::TwoLayerConfig;

/// Settings shared by every command of one invocation.
///
/// Command-line flags win over the config file, which wins over defaults.
pub struct RunContext {
    pub config: AppConfig,
    pub gpg_path: Option<PathBuf>,
    pub homedir: Option<PathBuf>,
    pub assume_yes: bool,
}

impl RunContext {
    pub fn from_args(args: &Cli) -> Result<Self> {
        let config = AppConfig::load(args.config.as_deref())?;

        let gpg_path = args.gpg.clone().or_else(|| config.engine.gpg_path.clone());
        let homedir = args.homedir.clone().or_else(|| config.engine.homedir.clone());

        Ok(Self {
            config,
            gpg_path,
            homedir,
            assume_yes: args.yes,
        })
    }

    /// Build the gpg adapter from the resolved paths.
    pub fn engine(&self) -> GpgEngine {
        let engine = match &self.gpg_path {
            Some(path) => GpgEngine::with_path(path.clone()),
            None => GpgEngine::new(),
        }
        .homedir(self.homedir.clone());

        output::detail(&format!("Engine: {}", engine.gpg_path().display()));
        if let Some(home) = &self.homedir {
            output::detail(&format!("GnuPG home: {}", home.display()));
        }
        engine
    }

    pub fn two_layer_config(&self) -> Result<TwoLayerConfig> {
        self.config.two_layer()
    }

    pub fn interaction(&self) -> TerminalInteraction {
        TerminalInteraction::new(self.assume_yes)
    }

    /// The audit logger, or `None` when auditing is disabled.
    pub fn audit_logger(&self) -> Option<JsonAuditLogger> {
        if !self.config.audit.enabled {
            return None;
        }
        match &self.config.audit.log_file {
            Some(path) => Some(JsonAuditLogger::new(path.clone())),
            None => match JsonAuditLogger::default_path() {
                Ok(path) => Some(JsonAuditLogger::new(path)),
                Err(e) => {
                    output::warning(&format!("Audit log disabled: {e}"));
                    None
                }
            },
        }
    }
}
