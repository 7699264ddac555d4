//! CLI definition and parsing.
//!
//! Notes:
//! - `-v` may be repeated: `-v` is info, `-vv` is debug.
//! - `--` ends option parsing so paths starting with `-` are taken literally.

use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Move files and directories to the trash instead of deleting them.
/// CLI flags override the environment, which overrides the XML config.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "trash",
    author,
    version,
    about = "Move files and directories to the trash instead of deleting them"
)]
pub struct Args {
    /// Paths to trash.
    #[arg(
        value_name = "PATH",
        value_hint = ValueHint::AnyPath,
        required_unless_present_any = ["print_config", "init_config"]
    )]
    pub paths: Vec<PathBuf>,

    /// Report each trashed path; repeat for debug diagnostics.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Trash strategy (overrides TRASH_STRATEGY and the config file).
    #[arg(long, value_name = "NAME")]
    pub strategy: Option<String>,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write diagnostics to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Show what would be trashed without touching anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the config file location and exit.
    #[arg(long, help = "Print the config file location used by trash and exit")]
    pub print_config: bool,

    /// Write a template config file (never overwrites) and exit.
    #[arg(long, conflicts_with = "print_config")]
    pub init_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --log-level value, then -v count raising the configured level.
    pub fn effective_log_level(&self, configured: LogLevel) -> LogLevel {
        if let Some(level) = self.log_level.as_deref().and_then(LogLevel::parse) {
            return level;
        }
        LogLevel::from_verbosity(self.verbose, configured)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(s) = &self.strategy {
            cfg.strategy = s.clone();
        }
        cfg.log_level = self.effective_log_level(cfg.log_level);
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
