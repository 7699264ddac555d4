//! Strategies that hand the path to something other than the built-in store.
//!
//! Each adapter guarantees on success that the original path no longer exists and the
//! content is recoverable from the platform's own trash. None of them write a `.trashinfo`.

mod command;
mod macos;

use std::path::Path;

use crate::errors::TrashError;
use crate::strategy::Strategy;

pub use command::CommandTrash;
pub use macos::MacosMv;

/// A platform "move to trash" capability.
pub trait PlatformTrash: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// `path` is absolute and exists (as a file, directory or link) when this is called.
    fn move_to_platform_trash(&self, path: &Path) -> Result<(), TrashError>;
}

/// The stock adapter for every strategy except `freedesktop`.
pub fn default_adapters(home: &Path) -> Vec<Box<dyn PlatformTrash>> {
    vec![
        Box::new(CommandTrash::gio()),
        Box::new(CommandTrash::trash_cli()),
        Box::new(CommandTrash::macos_trash_command()),
        Box::new(CommandTrash::macos_applescript()),
        Box::new(MacosMv::new(home.join(".Trash"))),
    ]
}
