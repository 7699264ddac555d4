//! Same-filesystem rename.
//! - Refuses to replace an existing destination (rename(2) would silently clobber files).
//! - On Unix, best-effort fsync of the destination directory after the rename.

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    if fs::symlink_metadata(dst).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", dst.display()),
        ));
    }

    fs::rename(src, dst)?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // The rename already happened; a failed fsync must not turn it into an error.
        let _ = super::util::fsync_dir(parent);
    }

    Ok(())
}
