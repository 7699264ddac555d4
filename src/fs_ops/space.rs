//! Free-space check before a cross-filesystem copy.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::platform::available_space;

/// Headroom kept free on the destination filesystem.
const CUSHION: u64 = 4 * 1024 * 1024;

pub(super) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Total size of the regular files under `src` (or of `src` itself).
pub(super) fn tree_size(src: &Path) -> u64 {
    let meta = match fs::symlink_metadata(src) {
        Ok(m) => m,
        Err(_) => return 0,
    };
    if !meta.is_dir() {
        return meta.len();
    }
    WalkDir::new(src)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

pub(super) fn ensure_space_for_copy(dst_dir: &Path, required: u64) -> io::Result<()> {
    let free = available_space(dst_dir)?;
    if free < required.saturating_add(CUSHION) {
        return Err(io::Error::new(
            io::ErrorKind::StorageFull,
            format!(
                "not enough free space in '{}': need ~{}, free {}",
                dst_dir.display(),
                format_bytes(required),
                format_bytes(free)
            ),
        ));
    }
    Ok(())
}
