//! Persistent settings for the `pivotal` CLI.
//!
//! This crate provides:
//! - [`ConfigStore`], a lazily loaded mirror of a flat JSON settings file
//!   with dirty tracking and crash-safe saves.
//! - Resolution of the default settings path (`PIVOTAL_CONFIG`, then
//!   `~/.pivotal_tracker_cli.json`).
//!
//! The store is a plain value: construct one per process and pass it by
//! `&mut` to whoever needs it.

pub mod env;
pub mod error;
pub mod setting;
pub mod store;

pub use env::{default_config_path, home_dir, CONFIG_FILE_NAME, CONFIG_PATH_ENV};
pub use error::{ConfigError, LoadError, Result};
pub use setting::{Setting, UnknownSetting};
pub use store::{ConfigState, ConfigStore};
