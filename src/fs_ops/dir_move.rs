//! Directory copy for cross-filesystem moves.
//! Rebuilds the tree under a hidden temp directory next to the destination, copies
//! regular files in parallel, recreates symlinks, then renames the temp tree into place.
//! On any failure the temp tree is removed and the source is left alone.

use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::atomic::try_atomic_move;
use super::copy::{copy_file_into, copy_symlink};
use super::helpers::io_error_with_help_io;
use super::metadata::preserve_metadata;
use super::util;

pub(super) fn copy_tree(src_dir: &Path, dest: &Path, preserve: bool) -> io::Result<()> {
    let dest_parent = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let tmp = util::unique_temp_path(dest_parent);

    let result = copy_tree_into(src_dir, &tmp, preserve).and_then(|()| {
        try_atomic_move(&tmp, dest).map_err(io_error_with_help_io("rename temporary tree into place", dest))
    });
    if result.is_err() {
        let _ = fs::remove_dir_all(&tmp);
    }
    result
}

fn copy_tree_into(src_dir: &Path, root: &Path, preserve: bool) -> io::Result<()> {
    fs::create_dir(root).map_err(io_error_with_help_io("create directory", root))?;

    let mut dirs: Vec<(PathBuf, PathBuf)> = vec![(src_dir.to_path_buf(), root.to_path_buf())];
    let mut files: Vec<(PathBuf, PathBuf)> = Vec::new();
    let mut links: Vec<(PathBuf, PathBuf)> = Vec::new();

    for entry in WalkDir::new(src_dir).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(io::Error::other)?;
        let target = root.join(rel);
        let ft = entry.file_type();
        if ft.is_dir() {
            fs::create_dir(&target).map_err(io_error_with_help_io("create directory", &target))?;
            dirs.push((entry.into_path(), target));
        } else if ft.is_symlink() {
            links.push((entry.into_path(), target));
        } else if ft.is_file() {
            files.push((entry.into_path(), target));
        } else {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot copy special file: {}", entry.path().display()),
            ));
        }
    }

    files.par_iter().try_for_each(|(src, dst)| -> io::Result<()> {
        let meta = fs::metadata(src).map_err(io_error_with_help_io("stat", src))?;
        copy_file_into(src, dst, &meta, preserve)
    })?;
    links
        .iter()
        .try_for_each(|(src, dst)| copy_symlink(src, dst))?;

    // Deepest first so restoring a read-only mode never blocks a later child.
    if preserve {
        for (src, dst) in dirs.iter().rev() {
            if let Ok(meta) = fs::metadata(src) {
                preserve_metadata(dst, &meta);
            }
        }
    }

    debug!(src = %src_dir.display(), files = files.len(), dirs = dirs.len(), links = links.len(), "copied directory tree");
    Ok(())
}
