//! FreeDesktop.org home trash: layout, `.trashinfo` rendering and the store itself.

mod info;
mod layout;
mod store;

pub use info::{TrashInfo, DELETION_DATE_FORMAT, HEADER, TRASHINFO_EXTENSION};
pub use layout::{home_dir, xdg_data_home, TrashLayout};
pub use store::{absolute_path, PlannedEntry, TrashEntry, TrashStore};
