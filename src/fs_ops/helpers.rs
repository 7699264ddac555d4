//! I/O error enrichment.
//!
//! Wraps an `io::Error` with the operation and path plus a short hint, while keeping
//! the original `ErrorKind` so callers can still classify it.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help_io("create dir", dir))?;  // io::Result
//!   fs::write(p, data).map_err(io_error_with_help("write config", p))?;           // anyhow::Result

use anyhow::anyhow;
use std::io;
use std::path::Path;

fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
            libc::EXDEV => "cross-filesystem; atomic rename not possible",
            libc::EBUSY => "resource busy",
            libc::ENOENT => "path not found",
            libc::EEXIST => "already exists",
            libc::ENOSPC => "no space left on device",
            libc::EROFS => "read-only filesystem",
            libc::ELOOP => "too many levels of symbolic links",
            libc::ENAMETOOLONG => "file name too long",
            libc::EMFILE | libc::ENFILE => "too many open files",
            _ => return None,
        };
        return Some(hint);
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Adapter for anyhow::Result code.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Adapter for io::Result code; preserves the original ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
