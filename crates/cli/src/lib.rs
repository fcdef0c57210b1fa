//! Library side of the `pivotal` command-line client.
//!
//! - [`cli`] declares the clap argument structure.
//! - [`app`] wires parsed commands to the settings store and terminal probe.

pub mod app;
pub mod cli;

pub use app::{execute, run};
pub use cli::{Cli, Commands, ConfigCommand};
