//! Adapters that shell out to an external trash program.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::errors::TrashError;
use crate::strategy::Strategy;

use super::PlatformTrash;

/// Finder deletion with the path passed as an argument, never spliced into the script.
const FINDER_DELETE_SCRIPT: [&str; 3] = [
    "on run argv",
    "tell application \"Finder\" to delete (POSIX file (item 1 of argv) as alias)",
    "end run",
];

/// Runs `program args... <absolute path>` and checks the path is gone afterwards.
#[derive(Debug, Clone)]
pub struct CommandTrash {
    strategy: Strategy,
    program: OsString,
    args: Vec<OsString>,
}

impl CommandTrash {
    pub fn new<I, S>(strategy: Strategy, program: impl AsRef<OsStr>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self {
            strategy,
            program: program.as_ref().to_os_string(),
            args: args.into_iter().map(|a| a.as_ref().to_os_string()).collect(),
        }
    }

    /// `gio trash -- <path>`
    pub fn gio() -> Self {
        Self::new(Strategy::Gio, "gio", ["trash", "--"])
    }

    /// `trash-put -- <path>` from trash-cli.
    pub fn trash_cli() -> Self {
        Self::new(Strategy::TrashCli, "trash-put", ["--"])
    }

    /// The system `trash` shipped with macOS 14+. Absolute, so it never resolves to this binary.
    pub fn macos_trash_command() -> Self {
        Self::new(Strategy::MacosTrashCommand, "/usr/bin/trash", Vec::<&str>::new())
    }

    pub fn macos_applescript() -> Self {
        let mut args = Vec::with_capacity(FINDER_DELETE_SCRIPT.len() * 2);
        for line in FINDER_DELETE_SCRIPT {
            args.push("-e");
            args.push(line);
        }
        Self::new(Strategy::MacosApplescript, "osascript", args)
    }

    fn failure(&self, detail: impl Into<String>) -> TrashError {
        TrashError::Adapter {
            strategy: self.strategy,
            detail: detail.into(),
        }
    }
}

impl PlatformTrash for CommandTrash {
    fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn move_to_platform_trash(&self, path: &Path) -> Result<(), TrashError> {
        debug!(
            strategy = %self.strategy,
            program = %self.program.to_string_lossy(),
            path = %path.display(),
            "running external trash command"
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => self.failure(format!(
                    "'{}' is not installed or not on PATH",
                    self.program.to_string_lossy()
                )),
                _ => self.failure(format!("could not run '{}': {e}", self.program.to_string_lossy())),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(if stderr.is_empty() {
                self.failure(format!("'{}' exited with {}", self.program.to_string_lossy(), output.status))
            } else {
                self.failure(format!(
                    "'{}' exited with {}: {stderr}",
                    self.program.to_string_lossy(),
                    output.status
                ))
            });
        }

        if fs::symlink_metadata(path).is_ok() {
            return Err(self.failure(format!(
                "'{}' reported success but '{}' still exists",
                self.program.to_string_lossy(),
                path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn success_requires_the_path_to_be_gone() {
        let td = tempdir().unwrap();
        let f = td.path().join("victim");
        fs::write(&f, b"x").unwrap();

        let removes = CommandTrash::new(Strategy::Gio, "rm", ["-f", "--"]);
        removes.move_to_platform_trash(&f).unwrap();
        assert!(!f.exists());

        fs::write(&f, b"x").unwrap();
        let lies = CommandTrash::new(Strategy::Gio, "true", Vec::<&str>::new());
        let err = lies.move_to_platform_trash(&f).unwrap_err();
        assert!(err.to_string().contains("still exists"), "{err}");
        assert!(f.exists());
    }

    #[test]
    fn non_zero_exit_is_reported_with_stderr() {
        let td = tempdir().unwrap();
        let missing = td.path().join("nope");
        let ls = CommandTrash::new(Strategy::TrashCli, "ls", ["--"]);
        let err = ls.move_to_platform_trash(&missing).unwrap_err();
        match err {
            TrashError::Adapter { strategy, detail } => {
                assert_eq!(strategy, Strategy::TrashCli);
                assert!(detail.contains("exited with"), "{detail}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_program_says_not_installed() {
        let td = tempdir().unwrap();
        let f = td.path().join("f");
        fs::write(&f, b"x").unwrap();
        let ghost = CommandTrash::new(Strategy::Gio, "trashcan-no-such-program-4821", Vec::<&str>::new());
        let err = ghost.move_to_platform_trash(&f).unwrap_err();
        assert!(err.to_string().contains("not installed"), "{err}");
        assert!(f.exists());
    }

    #[test]
    fn applescript_passes_path_as_argument() {
        let a = CommandTrash::macos_applescript();
        assert_eq!(a.program, "osascript");
        assert!(a.args.iter().any(|s| s == "on run argv"));
        assert!(a.args.iter().all(|s| !s.to_string_lossy().contains("/tmp")));
    }
}
