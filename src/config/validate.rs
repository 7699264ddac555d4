//! Config validation.

use anyhow::{bail, Result};
use std::path::Path;
use tracing::debug;

use super::types::Config;

impl Config {
    /// Reject settings that can only lead to surprises later.
    /// The strategy name is not checked here; the dispatcher resolves it per path.
    pub fn validate(&self) -> Result<()> {
        ensure_absolute(self.trash_dir.as_deref(), "trash_dir")?;
        ensure_absolute(self.macos_trash_dir.as_deref(), "macos_trash_dir")?;

        if let Some(log) = &self.log_file {
            if log.is_dir() {
                bail!("log_file '{}' is a directory", log.display());
            }
        }

        debug!(
            strategy = %self.strategy,
            trash_dir = ?self.trash_dir,
            log_level = %self.log_level,
            "config validated"
        );
        Ok(())
    }
}

fn ensure_absolute(path: Option<&Path>, name: &str) -> Result<()> {
    match path {
        Some(p) if !p.is_absolute() => bail!("{name} must be an absolute path, got '{}'", p.display()),
        _ => Ok(()),
    }
}
