//! Plain rename into `~/.Trash`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::TrashError;
use crate::fs_ops::{move_path, numbered_name, MAX_FILENAME_LEN};
use crate::strategy::Strategy;

use super::PlatformTrash;

const MAX_ATTEMPTS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct MacosMv {
    trash_dir: PathBuf,
    preserve_metadata: bool,
}

impl MacosMv {
    pub fn new(trash_dir: impl Into<PathBuf>) -> Self {
        Self {
            trash_dir: trash_dir.into(),
            preserve_metadata: true,
        }
    }

    pub fn preserve_metadata(mut self, yes: bool) -> Self {
        self.preserve_metadata = yes;
        self
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }
}

impl PlatformTrash for MacosMv {
    fn strategy(&self) -> Strategy {
        Strategy::MacosMv
    }

    fn move_to_platform_trash(&self, path: &Path) -> Result<(), TrashError> {
        let name = path.file_name().ok_or_else(|| TrashError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path has no final component",
        })?;
        if path.starts_with(&self.trash_dir) || self.trash_dir.starts_with(path) {
            return Err(TrashError::InsideTrash {
                path: path.to_path_buf(),
                trash_dir: self.trash_dir.clone(),
            });
        }
        fs::create_dir_all(&self.trash_dir)
            .map_err(|e| TrashError::from_io("create trash directory", &self.trash_dir, e))?;

        for n in 1..=MAX_ATTEMPTS {
            let candidate = numbered_name(name, n, MAX_FILENAME_LEN);
            if candidate.len() > MAX_FILENAME_LEN {
                return Err(TrashError::Io {
                    op: "choose trash name",
                    path: self.trash_dir.join(name),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "file name too long to store in the trash"),
                });
            }
            let dest = self.trash_dir.join(&candidate);
            if fs::symlink_metadata(&dest).is_ok() {
                continue;
            }
            match move_path(path, &dest, self.preserve_metadata) {
                Ok(kind) => {
                    info!(src = %path.display(), dest = %dest.display(), kind = ?kind, "moved into trash");
                    return Ok(());
                }
                // Lost a race for this name; try the next one.
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(TrashError::from_io("move to trash", path, e)),
            }
        }
        Err(TrashError::Io {
            op: "choose trash name",
            path: self.trash_dir.join(name),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "every candidate name is taken"),
        })
    }
}
