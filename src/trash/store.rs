//! The FreeDesktop trash store: places a path under `files/` and indexes it in `info/`.

use chrono::{Local, NaiveDateTime, Timelike};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::TrashError;
use crate::fs_ops::{move_path, numbered_name, MoveKind, MAX_FILENAME_LEN};

use super::info::{TrashInfo, TRASHINFO_EXTENSION};
use super::layout::TrashLayout;

/// Upper bound on `name (n).ext` candidates before giving up.
const MAX_ATTEMPTS: u64 = 10_000;

/// The paired result of one successful trash operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashEntry {
    pub original_absolute_path: PathBuf,
    pub trashed_file_path: PathBuf,
    pub info_file_path: PathBuf,
    pub deletion_timestamp: NaiveDateTime,
    pub move_kind: MoveKind,
}

/// What [`TrashStore::trash`] would do, computed without touching the trash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub original_absolute_path: PathBuf,
    pub trashed_file_path: PathBuf,
    pub info_file_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TrashStore {
    layout: TrashLayout,
    preserve_metadata: bool,
    write_info: InfoWriter,
}

/// A reserved destination: the `.trashinfo` file exists (empty, 0600) and
/// `files/<name>` did not exist when it was taken.
struct Slot {
    info_file: File,
    info_path: PathBuf,
    files_path: PathBuf,
}

/// Writes a rendered `.trashinfo` into its reserved file.
type InfoWriter = fn(&mut File, &str) -> io::Result<()>;

fn write_and_sync(file: &mut File, text: &str) -> io::Result<()> {
    file.write_all(text.as_bytes())?;
    file.sync_all()
}

impl Slot {
    fn write(mut self, info: &TrashInfo, writer: InfoWriter) -> io::Result<()> {
        writer(&mut self.info_file, &info.render())
    }

    fn release(self) {
        let Slot { info_file, info_path, .. } = self;
        drop(info_file);
        if let Err(e) = fs::remove_file(&info_path) {
            warn!(path = %info_path.display(), error = %e, "could not remove reserved trash info file");
        }
    }
}

impl TrashStore {
    pub fn new(layout: TrashLayout) -> Self {
        Self {
            layout,
            preserve_metadata: true,
            write_info: write_and_sync,
        }
    }

    /// Whether cross-filesystem copies keep mode, times and (with the `xattrs` feature) xattrs.
    pub fn preserve_metadata(mut self, yes: bool) -> Self {
        self.preserve_metadata = yes;
        self
    }

    pub fn layout(&self) -> &TrashLayout {
        &self.layout
    }

    /// Move `path` into the trash and write its `.trashinfo`.
    ///
    /// On failure the source is left in place, except for [`TrashError::Unindexed`]
    /// (the bytes are in `files/` without a sidecar) and the directory case where the
    /// copy completed but the source could not be fully removed.
    pub fn trash(&self, path: &Path) -> Result<TrashEntry, TrashError> {
        let original = self.prepare(path)?;
        self.layout.ensure()?;

        let name = final_component(&original)?;
        let slot = self.reserve_slot(name)?;
        debug!(
            src = %original.display(),
            dest = %slot.files_path.display(),
            "reserved trash slot"
        );

        let deleted_at = now_seconds();
        let info = TrashInfo::new(&original, deleted_at);

        let move_kind = match move_path(&original, &slot.files_path, self.preserve_metadata) {
            Ok(kind) => kind,
            Err(e) if fs::symlink_metadata(&slot.files_path).is_ok() => {
                // The copy landed but the source could not be removed. Index what we have.
                let trashed = slot.files_path.clone();
                if let Err(we) = slot.write(&info, self.write_info) {
                    warn!(path = %trashed.display(), error = %we, "could not index partially moved entry");
                }
                return Err(TrashError::Io {
                    op: "remove source after copy",
                    path: original,
                    source: e,
                });
            }
            Err(e) => {
                slot.release();
                return Err(TrashError::from_io("move to trash", &original, e));
            }
        };

        let trashed_file_path = slot.files_path.clone();
        let info_file_path = slot.info_path.clone();
        if let Err(e) = slot.write(&info, self.write_info) {
            if let Err(re) = fs::remove_file(&info_file_path) {
                warn!(path = %info_file_path.display(), error = %re, "could not remove incomplete trash info file");
            }
            return Err(TrashError::Unindexed {
                trashed: trashed_file_path,
                source: e,
            });
        }

        info!(
            src = %original.display(),
            dest = %trashed_file_path.display(),
            kind = ?move_kind,
            "trashed"
        );
        Ok(TrashEntry {
            original_absolute_path: original,
            trashed_file_path,
            info_file_path,
            deletion_timestamp: deleted_at,
            move_kind,
        })
    }

    /// Dry run: resolve `path` and pick the destination name without mutating anything.
    pub fn plan(&self, path: &Path) -> Result<PlannedEntry, TrashError> {
        let original = self.prepare(path)?;
        let name = final_component(&original)?;
        let max_len = max_stored_name_len();
        for n in 1..=MAX_ATTEMPTS {
            let candidate = numbered_name(name, n, max_len);
            if candidate.len() > max_len {
                if n == 1 {
                    continue;
                }
                return Err(name_too_long(&original));
            }
            let files_path = self.layout.files_path(&candidate);
            let info_path = self.layout.info_path(&candidate);
            if fs::symlink_metadata(&files_path).is_err() && fs::symlink_metadata(&info_path).is_err() {
                return Ok(PlannedEntry {
                    original_absolute_path: original,
                    trashed_file_path: files_path,
                    info_file_path: info_path,
                });
            }
        }
        Err(exhausted(&original))
    }

    /// Checks shared by `trash` and `plan`; returns the absolute original path.
    fn prepare(&self, path: &Path) -> Result<PathBuf, TrashError> {
        let original = absolute_path(path)?;
        let meta = fs::symlink_metadata(&original).map_err(|e| TrashError::from_io("stat", path, e))?;
        let ft = meta.file_type();
        if !(ft.is_file() || ft.is_dir() || ft.is_symlink()) {
            return Err(TrashError::UnsupportedType(original));
        }
        if self.layout.overlaps(&original) {
            return Err(TrashError::InsideTrash {
                path: original,
                trash_dir: self.layout.data_dir.clone(),
            });
        }
        Ok(original)
    }

    fn reserve_slot(&self, name: &OsStr) -> Result<Slot, TrashError> {
        let max_len = max_stored_name_len();
        for n in 1..=MAX_ATTEMPTS {
            let candidate: OsString = numbered_name(name, n, max_len);
            if candidate.len() > max_len {
                // Later candidates only grow longer.
                if n == 1 {
                    continue;
                }
                return Err(name_too_long(&self.layout.files_dir.join(name)));
            }
            let files_path = self.layout.files_path(&candidate);
            if fs::symlink_metadata(&files_path).is_ok() {
                continue;
            }
            let info_path = self.layout.info_path(&candidate);
            match create_reserved(&info_path) {
                Ok(info_file) => {
                    return Ok(Slot {
                        info_file,
                        info_path,
                        files_path,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(TrashError::from_io("reserve trash info", &info_path, e)),
            }
        }
        Err(exhausted(&self.layout.files_dir.join(name)))
    }
}

/// Absolute form of `path` as the user meant it: the working directory joined with
/// `path`, the parent canonicalized and the last component kept verbatim (a symlink
/// stays a symlink).
pub fn absolute_path(path: &Path) -> Result<PathBuf, TrashError> {
    if path.as_os_str().is_empty() {
        return Err(TrashError::InvalidPath {
            path: path.to_path_buf(),
            reason: "empty path",
        });
    }
    if ends_with_cur_dir(path) {
        return Err(TrashError::InvalidPath {
            path: path.to_path_buf(),
            reason: "refusing to trash '.'",
        });
    }
    let Some(name) = path.file_name() else {
        return Err(TrashError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path has no final component",
        });
    };

    let cwd = env::current_dir().map_err(|e| TrashError::from_io("read current directory", path, e))?;
    let joined = cwd.join(path);
    let parent = joined.parent().unwrap_or(&cwd);
    let parent = fs::canonicalize(parent).map_err(|e| TrashError::from_io("resolve parent directory", path, e))?;
    Ok(parent.join(name))
}

/// `.` or `.../.`; `Path::components` normalizes these away so look at the raw text.
fn ends_with_cur_dir(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        let b = path.as_os_str().as_bytes();
        b == b"." || b.ends_with(b"/.")
    }
    #[cfg(not(unix))]
    {
        let s = path.to_string_lossy();
        s == "." || s.ends_with("/.") || s.ends_with("\\.")
    }
}

fn final_component(abs: &Path) -> Result<&OsStr, TrashError> {
    abs.file_name().ok_or_else(|| TrashError::InvalidPath {
        path: abs.to_path_buf(),
        reason: "path has no final component",
    })
}

fn max_stored_name_len() -> usize {
    MAX_FILENAME_LEN - TRASHINFO_EXTENSION.len()
}

fn now_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn create_reserved(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts.open(path)
}

fn name_too_long(path: &Path) -> TrashError {
    TrashError::Io {
        op: "choose trash name",
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "file name too long to store in the trash"),
    }
}

fn exhausted(path: &Path) -> TrashError {
    TrashError::Io {
        op: "choose trash name",
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::AlreadyExists, "every candidate name is taken"),
    }
}
