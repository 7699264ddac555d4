//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::strategy::Strategy;
use crate::trash::TrashLayout;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Only errors (default)
    #[default]
    Quiet,
    /// Warnings and errors
    Normal,
    /// One line per trashed path
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// `-v` count to level: none keeps `base`, one is info, two or more is debug.
    pub fn from_verbosity(count: u8, base: LogLevel) -> LogLevel {
        match count {
            0 => base,
            1 => base.max(LogLevel::Info),
            _ => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Strategy name; resolved per request so a bad value fails before any mutation
    pub strategy: String,
    /// FreeDesktop trash root; `None` means the XDG default
    pub trash_dir: Option<PathBuf>,
    /// Destination for `macos_mv`; `None` means `~/.Trash`
    pub macos_trash_dir: Option<PathBuf>,
    /// Diagnostic verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Keep mode, times (and xattrs) when a move has to copy
    pub preserve_metadata: bool,
    /// Report what would happen without touching anything
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::platform_default().as_str().to_string(),
            trash_dir: None,
            macos_trash_dir: None,
            log_level: LogLevel::Quiet,
            log_file: None,
            preserve_metadata: true,
            dry_run: false,
        }
    }
}

impl Config {
    /// The FreeDesktop layout this config points at.
    pub fn trash_layout(&self) -> Option<TrashLayout> {
        match &self.trash_dir {
            Some(dir) => Some(TrashLayout::at(dir)),
            None => TrashLayout::from_env(),
        }
    }

    pub fn macos_trash_dir_or(&self, home: &Path) -> PathBuf {
        self.macos_trash_dir
            .clone()
            .unwrap_or_else(|| home.join(".Trash"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("Normal"), Some(LogLevel::Normal));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn verbosity_only_raises() {
        assert_eq!(LogLevel::from_verbosity(0, LogLevel::Quiet), LogLevel::Quiet);
        assert_eq!(LogLevel::from_verbosity(1, LogLevel::Quiet), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(1, LogLevel::Debug), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(3, LogLevel::Normal), LogLevel::Debug);
    }

    #[test]
    fn explicit_trash_dir_overrides_xdg() {
        let cfg = Config {
            trash_dir: Some(PathBuf::from("/srv/Trash")),
            ..Config::default()
        };
        assert_eq!(cfg.trash_layout().unwrap().files_dir, PathBuf::from("/srv/Trash/files"));
        assert_eq!(cfg.macos_trash_dir_or(Path::new("/u")), PathBuf::from("/u/.Trash"));
    }
}
