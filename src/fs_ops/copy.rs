//! Copy-and-rename helpers used when a rename crosses filesystems.
//! - Copies into a hidden temp sibling in the destination directory
//! - The temp file is verified and fsynced (io_copy::copy_verified)
//! - Renames temp -> dest without replacing anything (atomic::try_atomic_move)

use std::fs;
use std::io;
use std::path::Path;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help_io;
use super::metadata::{preserve_metadata, preserve_xattrs};
use super::{io_copy, util};

/// Copy a regular file to `dest`, which must not exist.
pub(super) fn copy_file_into(src: &Path, dest: &Path, src_meta: &fs::Metadata, preserve: bool) -> io::Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let tmp = util::unique_temp_path(dest_dir);

    if let Err(e) = io_copy::copy_verified(src, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help_io("copy to temporary file", &tmp)(e));
    }
    if preserve {
        preserve_metadata(&tmp, src_meta);
        preserve_xattrs(src, &tmp);
    }
    if let Err(e) = try_atomic_move(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help_io("rename temporary file into place", dest)(e));
    }
    Ok(())
}

/// Recreate the symlink `src` at `dest` (the link itself, never its target).
#[cfg(unix)]
pub(super) fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src).map_err(io_error_with_help_io("read link", src))?;
    std::os::unix::fs::symlink(&target, dest).map_err(io_error_with_help_io("create link", dest))
}

#[cfg(not(unix))]
pub(super) fn copy_symlink(src: &Path, _dest: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot copy symlink across filesystems: {}", src.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_without_leaving_temp_files() {
        let td = tempdir().unwrap();
        let src = td.path().join("src.bin");
        let out = td.path().join("out");
        fs::create_dir(&out).unwrap();
        let dest = out.join("dest.bin");
        fs::write(&src, b"payload").unwrap();
        let meta = fs::metadata(&src).unwrap();

        copy_file_into(&src, &dest, &meta, true).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        assert!(src.exists(), "copy must not remove the source");
        let names: Vec<_> = fs::read_dir(&out).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names.len(), 1, "unexpected leftovers: {names:?}");
    }

    #[test]
    fn existing_destination_is_kept_and_temp_removed() {
        let td = tempdir().unwrap();
        let src = td.path().join("src.bin");
        let out = td.path().join("out");
        fs::create_dir(&out).unwrap();
        let dest = out.join("dest.bin");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();
        let meta = fs::metadata(&src).unwrap();

        let err = copy_file_into(&src, &dest, &meta, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_copied_as_link() {
        let td = tempdir().unwrap();
        let link = td.path().join("link");
        let dest = td.path().join("copy");
        std::os::unix::fs::symlink("does-not-exist", &link).unwrap();

        copy_symlink(&link, &dest).unwrap();
        assert_eq!(fs::read_link(&dest).unwrap(), Path::new("does-not-exist"));
    }
}
