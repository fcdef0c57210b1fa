use clap::{Parser, Subcommand};
use pivotal_state::Setting;
use std::path::PathBuf;

/// Command-line interface for the `pivotal` application.
#[derive(Debug, Parser)]
#[command(
    name = "pivotal",
    version,
    about = "Pivotal Tracker command-line client"
)]
pub struct Cli {
    /// Settings file to use instead of ~/.pivotal_tracker_cli.json.
    #[arg(long, global = true, env = "PIVOTAL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available `pivotal` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reads and writes stored settings.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Prints the terminal size as COLUMNSxLINES.
    TermSize,
}

/// Settings subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Prints the settings file location.
    Path,
    /// Prints every stored setting as JSON.
    Show,
    /// Prints one setting (token, current_project, api_url).
    Get {
        #[arg(value_name = "SETTING")]
        setting: Setting,
    },
    /// Stores a setting and saves the settings file.
    Set {
        #[arg(value_name = "SETTING")]
        setting: Setting,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Removes a setting and saves the settings file.
    Unset {
        #[arg(value_name = "SETTING")]
        setting: Setting,
    },
}
