use std::fmt;
use std::process::{Command, Stdio};

use crate::path::find_command;

/// Environment variable holding the terminal width.
pub const COLUMNS_ENV: &str = "COLUMNS";
/// Environment variable holding the terminal height.
pub const LINES_ENV: &str = "LINES";

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub columns: u32,
    pub lines: u32,
}

impl fmt::Display for TerminalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.lines)
    }
}

/// Reports the terminal size, or `None` when no probe succeeds.
///
/// Probes in order: `COLUMNS` and `LINES` (both must be set), then
/// `tput cols` / `tput lines`, then `stty size`. The external commands are
/// only tried when found on `PATH`; a probe that fails falls through to the
/// next one.
pub fn terminal_size() -> Option<TerminalSize> {
    from_env().or_else(from_tput).or_else(from_stty)
}

fn from_env() -> Option<TerminalSize> {
    let columns = std::env::var(COLUMNS_ENV).ok()?;
    let lines = std::env::var(LINES_ENV).ok()?;
    let size = TerminalSize {
        columns: parse_dimension(&columns)?,
        lines: parse_dimension(&lines)?,
    };
    tracing::trace!(target: "pivotal::term", %size, "Terminal size from environment");
    Some(size)
}

fn from_tput() -> Option<TerminalSize> {
    let tput = find_command("tput")?;
    let columns = run_capture(Command::new(&tput).arg("cols"))?;
    let lines = run_capture(Command::new(&tput).arg("lines"))?;
    let size = TerminalSize {
        columns: parse_dimension(&columns)?,
        lines: parse_dimension(&lines)?,
    };
    tracing::trace!(target: "pivotal::term", %size, "Terminal size from tput");
    Some(size)
}

fn from_stty() -> Option<TerminalSize> {
    let stty = find_command("stty")?;
    let output = run_capture(Command::new(stty).arg("size"))?;
    let size = parse_stty_size(&output)?;
    tracing::trace!(target: "pivotal::term", %size, "Terminal size from stty");
    Some(size)
}

/// Runs `cmd` with the caller's stdin and stderr, returning captured stdout.
fn run_capture(cmd: &mut Command) -> Option<String> {
    let output = cmd
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .output()
        .inspect_err(|e| {
            tracing::trace!(target: "pivotal::term", error = %e, "Probe failed to spawn")
        })
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn parse_dimension(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// Parses `stty size` output, which is `"<lines> <columns>"`.
fn parse_stty_size(raw: &str) -> Option<TerminalSize> {
    let mut fields = raw.split_whitespace();
    let lines = parse_dimension(fields.next()?)?;
    let columns = parse_dimension(fields.next()?)?;
    Some(TerminalSize { columns, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotal_test_utils::{env_guard, set_env_var, EnvVarGuard};

    const COLUMNS: u32 = 388;
    const LINES: u32 = 125;
    const EXPECTED: TerminalSize = TerminalSize {
        columns: COLUMNS,
        lines: LINES,
    };

    fn clear_size_env() -> Vec<EnvVarGuard> {
        vec![set_env_var(COLUMNS_ENV, None), set_env_var(LINES_ENV, None)]
    }

    #[test]
    fn parse_stty_size_reorders_fields() {
        assert_eq!(parse_stty_size("125 388\n"), Some(EXPECTED));
        assert_eq!(parse_stty_size("125"), None);
        assert_eq!(parse_stty_size("rows cols"), None);
    }

    #[test]
    fn display_is_columns_by_lines() {
        assert_eq!(EXPECTED.to_string(), "388x125");
    }

    #[test]
    fn env_vars_win_over_everything() {
        /*
        GIVEN COLUMNS and LINES are both set and PATH is empty
        WHEN probing the terminal size
        THEN the environment values are reported
        */
        let _guard = env_guard();
        let _columns = set_env_var(COLUMNS_ENV, Some("388"));
        let _lines = set_env_var(LINES_ENV, Some("125"));
        let _path = set_env_var("PATH", Some(""));

        assert_eq!(terminal_size(), Some(EXPECTED));
    }

    #[test]
    fn wide_env_values_are_reported_as_given() {
        /*
        GIVEN COLUMNS wider than any real terminal
        WHEN probing the terminal size
        THEN the value is reported unchanged rather than skipped
        */
        let _guard = env_guard();
        let _columns = set_env_var(COLUMNS_ENV, Some("70000"));
        let _lines = set_env_var(LINES_ENV, Some("125"));
        let _path = set_env_var("PATH", Some(""));

        assert_eq!(
            terminal_size(),
            Some(TerminalSize {
                columns: 70_000,
                lines: 125
            })
        );
    }

    #[test]
    fn one_env_var_alone_is_not_enough() {
        let _guard = env_guard();
        let _clear = clear_size_env();
        let _columns = set_env_var(COLUMNS_ENV, Some("388"));
        let _path = set_env_var("PATH", Some(""));

        assert_eq!(terminal_size(), None);
    }

    #[test]
    fn nothing_available_yields_none() {
        let _guard = env_guard();
        let _clear = clear_size_env();
        let _path = set_env_var("PATH", Some(""));

        assert_eq!(terminal_size(), None);
    }

    #[cfg(unix)]
    mod probes {
        use super::*;
        use pivotal_test_utils::write_script;
        use tempfile::tempdir;

        const TPUT: &str = r#"if [ "$1" = "cols" ]; then
  echo 388
elif [ "$1" = "lines" ]; then
  echo 125
fi"#;

        const STTY: &str = r#"if [ "$1" = "size" ]; then
  echo 125 388
fi"#;

        #[test]
        fn tput_is_used_when_env_is_missing() {
            /*
            GIVEN no size env vars and a tput on PATH
            WHEN probing the terminal size
            THEN tput cols and tput lines are queried
            */
            let _guard = env_guard();
            let _clear = clear_size_env();
            let dir = tempdir().unwrap();
            write_script(dir.path(), "tput", TPUT, 0o700).unwrap();
            let _path = set_env_var("PATH", dir.path().to_str());

            assert_eq!(terminal_size(), Some(EXPECTED));
        }

        #[test]
        fn stty_is_used_when_tput_is_missing() {
            /*
            GIVEN no size env vars, no tput and an stty on PATH
            WHEN probing the terminal size
            THEN stty size output is parsed and reordered
            */
            let _guard = env_guard();
            let _clear = clear_size_env();
            let dir = tempdir().unwrap();
            write_script(dir.path(), "stty", STTY, 0o700).unwrap();
            let _path = set_env_var("PATH", dir.path().to_str());

            assert_eq!(terminal_size(), Some(EXPECTED));
        }

        #[test]
        fn broken_tput_falls_through_to_stty() {
            let _guard = env_guard();
            let _clear = clear_size_env();
            let dir = tempdir().unwrap();
            write_script(dir.path(), "tput", "echo unknown", 0o700).unwrap();
            write_script(dir.path(), "stty", STTY, 0o700).unwrap();
            let _path = set_env_var("PATH", dir.path().to_str());

            assert_eq!(terminal_size(), Some(EXPECTED));
        }

        #[test]
        fn non_executable_tput_is_skipped() {
            let _guard = env_guard();
            let _clear = clear_size_env();
            let dir = tempdir().unwrap();
            write_script(dir.path(), "tput", TPUT, 0o600).unwrap();
            let _path = set_env_var("PATH", dir.path().to_str());

            assert_eq!(terminal_size(), None);
        }
    }
}
