//! Trash strategies and name resolution.
//!
//! The set of strategies is closed. Names are matched exactly and case-sensitively;
//! anything else (including the empty string) is a [`ResolutionError`].

use std::fmt;
use std::str::FromStr;

use crate::errors::ResolutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Built-in FreeDesktop.org trash store (`files/` + `info/*.trashinfo`).
    Freedesktop,
    /// `trash-put` from the trash-cli project.
    TrashCli,
    /// `gio trash` (GLib/GVfs).
    Gio,
    /// macOS 14+ `/usr/bin/trash`.
    MacosTrashCommand,
    /// Finder via `osascript`.
    MacosApplescript,
    /// Plain rename into `~/.Trash`.
    MacosMv,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Freedesktop,
        Strategy::TrashCli,
        Strategy::Gio,
        Strategy::MacosTrashCommand,
        Strategy::MacosApplescript,
        Strategy::MacosMv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Freedesktop => "freedesktop",
            Strategy::TrashCli => "trash_cli",
            Strategy::Gio => "gio",
            Strategy::MacosTrashCommand => "macos_trash_command",
            Strategy::MacosApplescript => "macos_applescript",
            Strategy::MacosMv => "macos_mv",
        }
    }

    /// Strategy used when nothing was configured.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Strategy::MacosApplescript
        } else {
            Strategy::Freedesktop
        }
    }

    /// Comma-separated list of every known name, for messages.
    pub fn known_names() -> String {
        Self::ALL
            .iter()
            .map(Strategy::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Map a configured name onto a [`Strategy`].
pub fn resolve(name: &str) -> Result<Strategy, ResolutionError> {
    Strategy::ALL
        .iter()
        .copied()
        .find(|s| s.as_str() == name)
        .ok_or_else(|| ResolutionError::UnknownStrategy(name.to_string()))
}
