//! Typed error definitions for trashcan.
//! Resolution failures are kept apart from trash failures: the former never touch
//! the filesystem, the latter may leave one of the documented intermediate states.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::strategy::Strategy;

/// A strategy name that does not map to a known [`Strategy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("unknown trash strategy '{0}' (expected one of: {known})", known = Strategy::known_names())]
    UnknownStrategy(String),
}

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("no such file or directory: {0}")]
    NotFound(PathBuf),

    #[error("permission denied on {path}: {context}")]
    PermissionDenied { path: PathBuf, context: String },

    #[error("{op} '{}': {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file reached `files/` but its `.trashinfo` could not be written.
    /// Nothing is lost; the entry is merely unindexed.
    #[error("moved to '{}' but writing its trash info failed: {source}", .trashed.display())]
    Unindexed {
        trashed: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid path '{}': {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error("refusing to trash '{}': it overlaps the trash directory '{}'", .path.display(), .trash_dir.display())]
    InsideTrash { path: PathBuf, trash_dir: PathBuf },

    #[error("not a regular file, directory or symlink: {0}")]
    UnsupportedType(PathBuf),

    #[error("no adapter registered for strategy '{0}'")]
    Unsupported(Strategy),

    #[error("{strategy} failed: {detail}")]
    Adapter { strategy: Strategy, detail: String },

    #[error("operation interrupted by user")]
    Interrupted,
}

impl TrashError {
    /// Classify an `io::Error` raised while operating on `path`.
    pub fn from_io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => TrashError::NotFound(path),
            io::ErrorKind::PermissionDenied => TrashError::PermissionDenied {
                context: format!("{op}: {source}"),
                path,
            },
            io::ErrorKind::Interrupted => TrashError::Interrupted,
            _ => TrashError::Io { op, path, source },
        }
    }
}

/// Umbrella error returned per path by the dispatcher.
#[derive(Debug, Error)]
pub enum TrashcanError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Trash(#[from] TrashError),
}

impl TrashcanError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            TrashcanError::Resolution(ResolutionError::UnknownStrategy(_)) => 10,
            TrashcanError::Trash(e) => match e {
                TrashError::NotFound(_) => 20,
                TrashError::PermissionDenied { .. } => 21,
                TrashError::Io { .. } => 22,
                TrashError::Unindexed { .. } => 23,
                TrashError::InvalidPath { .. } => 24,
                TrashError::InsideTrash { .. } => 25,
                TrashError::UnsupportedType(_) => 26,
                TrashError::Unsupported(_) => 30,
                TrashError::Adapter { .. } => 31,
                TrashError::Interrupted => 130,
            },
        }
    }

    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TrashcanError::Resolution(_) => "unknown_strategy",
            TrashcanError::Trash(e) => match e {
                TrashError::NotFound(_) => "not_found",
                TrashError::PermissionDenied { .. } => "permission_denied",
                TrashError::Io { .. } => "io_failure",
                TrashError::Unindexed { .. } => "unindexed",
                TrashError::InvalidPath { .. } => "invalid_path",
                TrashError::InsideTrash { .. } => "inside_trash",
                TrashError::UnsupportedType(_) => "unsupported_type",
                TrashError::Unsupported(_) => "unsupported_strategy",
                TrashError::Adapter { .. } => "adapter_failed",
                TrashError::Interrupted => "interrupted",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified_by_kind() {
        let nf = TrashError::from_io("stat", "/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(nf, TrashError::NotFound(p) if p == PathBuf::from("/x")));

        let pd = TrashError::from_io(
            "create",
            "/y",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(pd, TrashError::PermissionDenied { .. }));

        let other = TrashError::from_io("write", "/z", io::Error::other("disk on fire"));
        assert!(matches!(other, TrashError::Io { op: "write", .. }));
    }

    #[test]
    fn unknown_strategy_message_lists_known_names() {
        let e = ResolutionError::UnknownStrategy("bogus".into());
        let msg = e.to_string();
        assert!(msg.contains("'bogus'"));
        assert!(msg.contains("freedesktop"));
        assert!(msg.contains("macos_mv"));
    }

    #[test]
    fn codes_are_distinct_per_kind() {
        let a: TrashcanError = ResolutionError::UnknownStrategy(String::new()).into();
        let b: TrashcanError = TrashError::NotFound(PathBuf::from("/q")).into();
        assert_ne!(a.code(), b.code());
        assert_eq!(a.kind(), "unknown_strategy");
        assert_eq!(b.kind(), "not_found");
    }
}
