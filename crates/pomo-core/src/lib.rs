//! Pomo Core - Shared functionality for the pomo focus timer
//!
//! Standard paths, the user config file and the display formatting
//! helpers used by both the timer core and the terminal shell.

pub mod config;
pub mod format;
pub mod paths;

pub use config::Config;
pub use paths::Paths;
