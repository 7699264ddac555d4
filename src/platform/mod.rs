//! Platform-specific helpers.
//! Hides Unix/non-Unix differences behind one small API.

#[cfg(unix)]
mod common_unix;
#[cfg(not(unix))]
mod other;
mod temp;
#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::{available_space, open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600};

#[cfg(not(unix))]
pub use other::{available_space, open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600};
