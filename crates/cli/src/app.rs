use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pivotal_state::{ConfigStore, Setting};
use pivotal_term::terminal_size;
use serde_json::Value;

use crate::cli::{Cli, Commands, ConfigCommand};

/// The main entry point for the `pivotal` application.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Runs a parsed command, writing user-facing output to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Config(command) => {
            let mut store = match cli.config {
                Some(path) => ConfigStore::new(path),
                None => ConfigStore::from_env().context("failed to resolve settings path")?,
            };
            run_config(command, &mut store, out)
        }
        Commands::TermSize => {
            match terminal_size() {
                Some(size) => writeln!(out, "{size}")?,
                None => writeln!(out, "unknown")?,
            }
            Ok(())
        }
    }
}

fn run_config(
    command: ConfigCommand,
    store: &mut ConfigStore,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        ConfigCommand::Path => {
            writeln!(out, "{}", store.path().display())?;
        }
        ConfigCommand::Show => {
            store.load()?;
            let snapshot = store.snapshot()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&*snapshot)?)?;
        }
        ConfigCommand::Get { setting } => match store.get(setting)? {
            Some(value) => writeln!(out, "{}", display_value(&value))?,
            None => bail!("{setting} is not set"),
        },
        ConfigCommand::Set { setting, value } => {
            let value = parse_value(setting, value);
            let shown = display_value(&value);
            store.set(setting, value)?;
            store
                .save()
                .with_context(|| format!("failed to store {setting}"))?;
            tracing::debug!(target: "pivotal::cli", %setting, "Updated setting");
            writeln!(out, "{setting} = {shown}")?;
        }
        ConfigCommand::Unset { setting } => {
            if store.unset(setting)?.is_some() {
                store
                    .save()
                    .with_context(|| format!("failed to remove {setting}"))?;
                writeln!(out, "removed {setting}")?;
            } else {
                writeln!(out, "{setting} was not set")?;
            }
        }
    }
    Ok(())
}

/// Project ids that look numeric are stored as JSON numbers; everything
/// else is stored verbatim as a string.
fn parse_value(setting: Setting, raw: String) -> Value {
    match setting {
        Setting::CurrentProject => match raw.trim().parse::<u64>() {
            Ok(id) => Value::from(id),
            Err(_) => Value::String(raw),
        },
        Setting::Token | Setting::ApiUrl => Value::String(raw),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotal_test_utils::ConfigFixture;
    use std::path::Path;

    fn run_with(path: &Path, args: &[&str]) -> Result<String> {
        let mut argv = vec!["pivotal", "--config", path.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        execute(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parse_value_keeps_tokens_as_strings() {
        assert_eq!(
            parse_value(Setting::Token, "1234".into()),
            Value::String("1234".into())
        );
        assert_eq!(
            parse_value(Setting::CurrentProject, "789".into()),
            Value::from(789u64)
        );
        assert_eq!(
            parse_value(Setting::CurrentProject, "abc".into()),
            Value::String("abc".into())
        );
    }

    #[test]
    fn set_then_get_round_trips_through_the_file() {
        /*
        GIVEN no settings file
        WHEN a project id is set and read back by a new invocation
        THEN the file holds a JSON number and get prints it
        */
        let fixture = ConfigFixture::new().unwrap();
        let path = &fixture.config_path;

        let out = run_with(path, &["config", "set", "current_project", "789"]).unwrap();
        assert_eq!(out, "current_project = 789\n");
        assert_eq!(fixture.read().as_deref(), Some(r#"{"current_project":789}"#));

        let out = run_with(path, &["config", "get", "current_project"]).unwrap();
        assert_eq!(out, "789\n");
    }

    #[test]
    fn get_unset_setting_fails() {
        let fixture = ConfigFixture::new().unwrap();

        let err = run_with(&fixture.config_path, &["config", "get", "token"]).unwrap_err();

        assert!(err.to_string().contains("token is not set"));
        assert!(!fixture.exists());
    }

    #[test]
    fn show_prints_empty_object_without_creating_file() {
        let fixture = ConfigFixture::new().unwrap();

        let out = run_with(&fixture.config_path, &["config", "show"]).unwrap();

        assert_eq!(out, "{}\n");
        assert!(!fixture.exists());
    }

    #[test]
    fn show_reports_invalid_file() {
        let fixture = ConfigFixture::with_contents("[1, 2]").unwrap();

        let err = run_with(&fixture.config_path, &["config", "show"]).unwrap_err();

        assert!(err.to_string().contains("unable to load config file"));
    }

    #[test]
    fn unset_removes_and_saves() {
        let fixture =
            ConfigFixture::with_contents(r#"{"token":"abc","api_url":"https://x"}"#).unwrap();

        let out = run_with(&fixture.config_path, &["config", "unset", "token"]).unwrap();
        assert_eq!(out, "removed token\n");
        assert_eq!(fixture.read().as_deref(), Some(r#"{"api_url":"https://x"}"#));

        let out = run_with(&fixture.config_path, &["config", "unset", "token"]).unwrap();
        assert_eq!(out, "token was not set\n");
    }

    #[test]
    fn path_prints_configured_location() {
        let fixture = ConfigFixture::new().unwrap();

        let out = run_with(&fixture.config_path, &["config", "path"]).unwrap();

        assert_eq!(out, format!("{}\n", fixture.config_path.display()));
    }
}
