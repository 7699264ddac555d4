//! Configuration: types, default paths, XML loading and validation.
//!
//! Precedence, lowest first: built-in defaults, the XML file, `TRASH_STRATEGY`,
//! then command-line flags (applied by the CLI layer).

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{apply_env, create_template_config, load_config, load_config_from_xml_path};

/// Explicit config file location.
pub const CONFIG_ENV: &str = "TRASH_CONFIG";
/// Strategy override; empty means unset.
pub const STRATEGY_ENV: &str = "TRASH_STRATEGY";
