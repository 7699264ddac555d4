//! The `.trashinfo` sidecar.
//!
//! Exactly three newline-terminated lines:
//! ```text
//! [Trash Info]
//! Path=<percent-encoded absolute original path>
//! DeletionDate=YYYY-MM-DDTHH:MM:SS
//! ```

use chrono::NaiveDateTime;
use std::path::Path;

use crate::encode::encode_path;

pub const TRASHINFO_EXTENSION: &str = ".trashinfo";
pub const HEADER: &str = "[Trash Info]";
/// Local time, second precision, no offset.
pub const DELETION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashInfo {
    /// Already percent-encoded.
    pub path: String,
    pub deletion_date: NaiveDateTime,
}

impl TrashInfo {
    pub fn new(original: &Path, deletion_date: NaiveDateTime) -> Self {
        Self {
            path: encode_path(original),
            deletion_date,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{HEADER}\nPath={}\nDeletionDate={}\n",
            self.path,
            self.deletion_date.format(DELETION_DATE_FORMAT)
        )
    }
}
