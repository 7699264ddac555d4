//! Streaming copy with verification.
//!
//! - The destination is created with `create_new` (never clobbers).
//! - Linux tries `copy_file_range` first, then falls back to buffered `io::copy` (1 MiB buffers).
//! - The destination is fsynced before returning.
//! - The number of bytes written must equal the source length observed at open time,
//!   otherwise the copy is reported as `InvalidData` and the caller must not remove the source.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> `dst` (which must not exist), fsync it and verify the length.
/// Returns the number of bytes copied.
pub(super) fn copy_verified(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let expected = src_f.metadata()?.len();

    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let copied = copy_contents(src_f, dst_f)?;
    if copied != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "short copy of '{}': wrote {copied} of {expected} bytes",
                src.display()
            ),
        ));
    }
    Ok(copied)
}

fn copy_contents(src_f: File, dst_f: File) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    if let Some(n) = copy_file_range_all(&src_f, &dst_f)? {
        dst_f.sync_all()?;
        return Ok(n);
    }

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(bytes)
}

/// In-kernel copy. `Ok(None)` means unsupported here; nothing was written.
#[cfg(target_os = "linux")]
fn copy_file_range_all(src_f: &File, dst_f: &File) -> io::Result<Option<u64>> {
    use std::os::unix::io::AsRawFd;

    const CHUNK: usize = 16 * 1024 * 1024;
    let mut total: u64 = 0;
    loop {
        let rc = unsafe {
            libc::copy_file_range(
                src_f.as_raw_fd(),
                std::ptr::null_mut(),
                dst_f.as_raw_fd(),
                std::ptr::null_mut(),
                CHUNK,
                0,
            )
        };
        if rc > 0 {
            total += rc as u64;
            continue;
        }
        if rc == 0 {
            return Ok(Some(total));
        }
        let err = io::Error::last_os_error();
        let unsupported = matches!(
            err.raw_os_error(),
            Some(code) if code == libc::EXDEV || code == libc::ENOSYS || code == libc::EINVAL || code == libc::EPERM || code == libc::EOPNOTSUPP
        );
        if total == 0 && unsupported {
            return Ok(None);
        }
        return Err(err);
    }
}
