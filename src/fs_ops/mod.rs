//! Filesystem operations: moving paths into a trash directory.

mod atomic;
mod copy;
mod dir_move;
mod duplicate;
mod entry;
mod helpers;
mod io_copy;
mod metadata;
mod space;
mod util;

pub use duplicate::{numbered_name, MAX_FILENAME_LEN};
pub use entry::{move_path, MoveKind};
pub use helpers::{io_error_with_help, io_error_with_help_io};
