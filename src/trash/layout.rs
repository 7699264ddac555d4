//! On-disk layout of the home trash: `<data_dir>/files` and `<data_dir>/info`.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::TrashError;
use crate::platform::set_dir_mode_0700;

use super::info::TRASHINFO_EXTENSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashLayout {
    pub data_dir: PathBuf,
    pub files_dir: PathBuf,
    pub info_dir: PathBuf,
}

impl TrashLayout {
    /// Layout rooted at an explicit trash directory.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            files_dir: data_dir.join("files"),
            info_dir: data_dir.join("info"),
            data_dir,
        }
    }

    /// `$XDG_DATA_HOME/Trash`, or `$HOME/.local/share/Trash` when it is unset or empty.
    pub fn from_env() -> Option<Self> {
        xdg_data_home().map(|d| Self::at(d.join("Trash")))
    }

    /// Create `files/` and `info/` (and the trash root) if missing, mode 0700.
    pub fn ensure(&self) -> Result<(), TrashError> {
        for dir in [&self.data_dir, &self.files_dir, &self.info_dir] {
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(dir).map_err(|e| TrashError::from_io("create trash directory", dir, e))?;
            set_dir_mode_0700(dir).map_err(|e| TrashError::from_io("chmod 0700", dir, e))?;
            debug!(path = %dir.display(), "created trash directory");
        }
        Ok(())
    }

    pub fn files_path(&self, name: &OsStr) -> PathBuf {
        self.files_dir.join(name)
    }

    pub fn info_path(&self, name: &OsStr) -> PathBuf {
        let mut file_name = OsString::from(name);
        file_name.push(TRASHINFO_EXTENSION);
        self.info_dir.join(file_name)
    }

    /// True when `abs` is the trash directory, lies inside it, or contains it.
    pub fn overlaps(&self, abs: &Path) -> bool {
        let root = fs::canonicalize(&self.data_dir).unwrap_or_else(|_| self.data_dir.clone());
        abs.starts_with(&root)
            || root.starts_with(abs)
            || abs.starts_with(&self.data_dir)
            || self.data_dir.starts_with(abs)
    }
}

/// The XDG data home: `$XDG_DATA_HOME` if set to an absolute path, else `~/.local/share`.
pub fn xdg_data_home() -> Option<PathBuf> {
    if let Some(v) = env::var_os("XDG_DATA_HOME") {
        let p = PathBuf::from(v);
        if !p.as_os_str().is_empty() && p.is_absolute() {
            return Some(p);
        }
    }
    home_dir().map(|h| h.join(".local").join("share"))
}

/// `$HOME` if set and non-empty, else the platform's notion of the home directory.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn layout_paths() {
        let l = TrashLayout::at("/data/Trash");
        assert_eq!(l.files_dir, PathBuf::from("/data/Trash/files"));
        assert_eq!(l.info_dir, PathBuf::from("/data/Trash/info"));
        assert_eq!(
            l.info_path(OsStr::new("a b&c.txt")),
            PathBuf::from("/data/Trash/info/a b&c.txt.trashinfo")
        );
        assert_eq!(l.files_path(OsStr::new("x")), PathBuf::from("/data/Trash/files/x"));
    }

    #[test]
    #[serial]
    fn xdg_data_home_wins_when_set_and_absolute() {
        let prev_xdg = env::var_os("XDG_DATA_HOME");
        let prev_home = env::var_os("HOME");
        unsafe {
            env::set_var("XDG_DATA_HOME", "/xdg/data");
            env::set_var("HOME", "/home/someone");
        }
        assert_eq!(TrashLayout::from_env().unwrap().data_dir, PathBuf::from("/xdg/data/Trash"));

        unsafe { env::set_var("XDG_DATA_HOME", "") };
        assert_eq!(
            TrashLayout::from_env().unwrap().data_dir,
            PathBuf::from("/home/someone/.local/share/Trash")
        );

        unsafe { env::set_var("XDG_DATA_HOME", "relative/data") };
        assert_eq!(
            TrashLayout::from_env().unwrap().data_dir,
            PathBuf::from("/home/someone/.local/share/Trash")
        );

        unsafe { env::remove_var("XDG_DATA_HOME") };
        assert_eq!(
            TrashLayout::from_env().unwrap().data_dir,
            PathBuf::from("/home/someone/.local/share/Trash")
        );

        unsafe {
            match prev_xdg {
                Some(v) => env::set_var("XDG_DATA_HOME", v),
                None => env::remove_var("XDG_DATA_HOME"),
            }
            match prev_home {
                Some(v) => env::set_var("HOME", v),
                None => env::remove_var("HOME"),
            }
        }
    }

    #[test]
    fn ensure_is_idempotent() {
        let td = tempdir().unwrap();
        let l = TrashLayout::at(td.path().join("deep/Trash"));
        l.ensure().unwrap();
        l.ensure().unwrap();
        assert!(l.files_dir.is_dir());
        assert!(l.info_dir.is_dir());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            for d in [&l.data_dir, &l.files_dir, &l.info_dir] {
                assert_eq!(fs::metadata(d).unwrap().permissions().mode() & 0o777, 0o700);
            }
        }
    }

    #[test]
    fn overlap_detection() {
        let l = TrashLayout::at("/data/Trash");
        assert!(l.overlaps(Path::new("/data/Trash")));
        assert!(l.overlaps(Path::new("/data/Trash/files/x")));
        assert!(l.overlaps(Path::new("/data")));
        assert!(!l.overlaps(Path::new("/data/Other")));
        assert!(!l.overlaps(Path::new("/data/Trash2")));
    }
}
