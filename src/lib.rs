//! Core library for `trashcan`.
//!
//! Moves files to a recoverable trash instead of unlinking them. The built-in
//! strategy implements the FreeDesktop.org home trash (`files/` + `info/*.trashinfo`);
//! the others hand the path to a platform tool.
//!
//! Layout:
//! - `encode`: percent-encoding of the original path for `.trashinfo`
//! - `strategy`: the closed set of strategies and name resolution
//! - `trash`: the FreeDesktop trash store
//! - `adapters`: platform trash collaborators
//! - `dispatch`: per-path routing and batch reporting
//! - `fs_ops`: rename-or-copy move engine
//! - `config`, `cli`, `output`, `platform`, `shutdown`: ambient plumbing

pub mod adapters;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod encode;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod shutdown;
pub mod strategy;
pub mod trash;

pub use config::{
    create_template_config, default_config_path, load_config, path_has_symlink_ancestor, Config, LogLevel,
};
pub use dispatch::{BatchReport, Dispatcher, Outcome, TrashRequest};
pub use errors::{ResolutionError, TrashError, TrashcanError};
pub use strategy::{resolve, Strategy};
pub use trash::{TrashEntry, TrashLayout, TrashStore};
