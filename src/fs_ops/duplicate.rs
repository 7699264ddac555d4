//! Collision-free naming inside a trash directory.
//!
//! Candidates are `name`, then `stem (2).ext`, `stem (3).ext`, ... The stem is
//! truncated when needed so the final name fits within `max_len` bytes; an extension
//! too long to leave room for any stem is truncated as well.
//!
//! Examples:
//! - "movie.mkv" -> "movie (2).mkv", "movie (3).mkv", ...
//! - ".env" -> ".env (2)"
//! - "archive.tar.gz" -> "archive.tar (2).gz"

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Typical POSIX/ext limit on a single path component.
pub const MAX_FILENAME_LEN: usize = 255;

/// The `n`-th candidate for `name` (n = 1 is `name` itself).
pub fn numbered_name(name: &OsStr, n: u64, max_len: usize) -> OsString {
    if n <= 1 {
        return name.to_os_string();
    }
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    let ext = base.extension();
    build_name_with_suffix(&stem, ext, &format!(" ({n})"), max_len)
}

#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// `stem + suffix + ["." + ext]`, shrinking the stem (and, if that is not enough,
/// the extension) to stay within `max_len`. The stem keeps at least one unit.
fn build_name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str, max_len: usize) -> OsString {
    let ext_budget = max_len.saturating_sub(suffix.len() + 2);
    let ext = ext.map(|e| {
        if name_len_units(e) <= ext_budget {
            e.to_os_string()
        } else {
            truncate_to(e, ext_budget)
        }
    });

    let mut overhead = suffix.len();
    let mut ext_part = OsString::new();
    if let Some(e) = ext.filter(|e| !e.is_empty()) {
        overhead = overhead.saturating_add(1 + name_len_units(&e));
        ext_part.push(".");
        ext_part.push(e);
    }

    let budget = max_len.saturating_sub(overhead).max(1);
    let stem_os = if name_len_units(stem) <= budget {
        stem.to_os_string()
    } else {
        let t = truncate_to(stem, budget);
        if t.is_empty() { OsString::from("f") } else { t }
    };

    let mut new_name = stem_os;
    new_name.push(suffix);
    new_name.push(&ext_part);
    new_name
}

/// Longest prefix of `s` within `budget` units, cut on a char boundary when `s` is UTF-8.
fn truncate_to(s: &OsStr, budget: usize) -> OsString {
    if let Some(s) = s.to_str() {
        let mut end = 0;
        for (i, ch) in s.char_indices() {
            if i + ch.len_utf8() > budget {
                break;
            }
            end = i + ch.len_utf8();
        }
        return OsString::from(&s[..end]);
    }

    #[cfg(unix)]
    {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        let bytes = s.as_bytes();
        OsString::from_vec(bytes[..bytes.len().min(budget)].to_vec())
    }
    #[cfg(not(unix))]
    {
        truncate_to(OsStr::new(s.to_string_lossy().as_ref()), budget)
    }
}
