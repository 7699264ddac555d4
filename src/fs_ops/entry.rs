use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::shutdown;

use super::atomic::try_atomic_move;
use super::copy::{copy_file_into, copy_symlink};
use super::dir_move::copy_tree;
use super::helpers::io_error_with_help_io;
use super::space::{ensure_space_for_copy, tree_size};
use super::util::is_cross_device;

/// How a path reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Same-filesystem rename.
    Renamed,
    /// Copied, verified, then the source was removed.
    Copied,
}

/// Move a file, directory or symlink to `dest`, which must not exist.
///
/// - Tries a rename first.
/// - On a cross-device error, copies (content verified and fsynced) and only then
///   removes the source. If removing a copied file fails, the copy is discarded so the
///   source stays the single authoritative version.
/// - Stats with `symlink_metadata` so links are moved as links.
pub fn move_path(src: &Path, dest: &Path, preserve_metadata: bool) -> io::Result<MoveKind> {
    if shutdown::is_requested() {
        return Err(io::Error::new(io::ErrorKind::Interrupted, "shutdown requested"));
    }

    let lmeta = fs::symlink_metadata(src).map_err(io_error_with_help_io("stat source", src))?;

    match try_atomic_move(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "renamed");
            return Ok(MoveKind::Renamed);
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dest = %dest.display(), "cross-filesystem; copying instead of renaming");
        }
        Err(e) => return Err(io_error_with_help_io("rename", src)(e)),
    }

    let dest_dir = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    ensure_space_for_copy(dest_dir, tree_size(src))?;

    let ft = lmeta.file_type();
    if ft.is_dir() {
        copy_tree(src, dest, preserve_metadata)?;
        // A partially removed source must not cost the copy: keep it and report.
        fs::remove_dir_all(src).map_err(io_error_with_help_io("remove source directory after copy", src))?;
    } else {
        if ft.is_symlink() {
            copy_symlink(src, dest)?;
        } else if ft.is_file() {
            copy_file_into(src, dest, &lmeta, preserve_metadata)?;
        } else {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("not a regular file, directory or symlink: {}", src.display()),
            ));
        }
        if let Err(e) = fs::remove_file(src) {
            if let Err(ce) = fs::remove_file(dest) {
                warn!(dest = %dest.display(), error = %ce, "could not discard copy after failing to remove source");
            }
            return Err(io_error_with_help_io("remove source after copy", src)(e));
        }
    }

    debug!(src = %src.display(), dest = %dest.display(), "copied and removed source");
    Ok(MoveKind::Copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renames_file_on_same_filesystem() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, b"hello").unwrap();

        assert_eq!(move_path(&src, &dest, false).unwrap(), MoveKind::Renamed);
        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"hello");
    }

    #[test]
    fn renames_directory() {
        let td = tempdir().unwrap();
        let src = td.path().join("dir");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/x"), b"x").unwrap();
        let dest = td.path().join("moved");

        move_path(&src, &dest, false).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(dest.join("sub/x")).unwrap(), b"x");
    }

    #[test]
    fn missing_source_is_not_found() {
        let td = tempdir().unwrap();
        let err = move_path(&td.path().join("nope"), &td.path().join("dest"), false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn never_overwrites_destination() {
        let td = tempdir().unwrap();
        let src = td.path().join("a");
        let dest = td.path().join("b");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        let err = move_path(&src, &dest, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert_eq!(fs::read(&src).unwrap(), b"new");
    }
}
