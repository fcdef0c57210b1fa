//! Terminal helpers for the `pivotal` CLI.
//!
//! - [`terminal_size`] reports the terminal dimensions from `COLUMNS`/`LINES`,
//!   `tput` or `stty`, in that order.
//! - [`command_exists`] and [`find_command`] search `PATH` for executables.

pub mod path;
pub mod size;

pub use path::{command_exists, find_command};
pub use size::{terminal_size, TerminalSize, COLUMNS_ENV, LINES_ENV};
