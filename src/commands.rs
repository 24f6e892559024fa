//! # Commands
//!
//! One function per subcommand. `main` parses arguments and hands over; the
//! functions here own the history file round trip and the output format.
//! Output goes to any `Write` so tests can capture it.

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use log::{debug, info};

use crate::core::config::{ConfigError, ResolvedConfig};
use crate::core::history::{History, HistoryError};
use crate::install::{self, InstallError, Outcome};
use crate::prompt::style::StyledText;
use crate::prompt::{PromptError, Terminal, ask_int};
use crate::shells::Shell;

#[derive(Debug)]
pub enum CommandError {
    Config(ConfigError),
    History(HistoryError),
    Install(InstallError),
    Prompt(PromptError),
    /// The shell menu answer did not name a supported shell.
    UnsupportedShell(i64),
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Config(e) => write!(f, "{e}"),
            CommandError::History(e) => write!(f, "{e}"),
            CommandError::Install(e) => write!(f, "{e}"),
            CommandError::Prompt(e) => write!(f, "{e}"),
            CommandError::UnsupportedShell(n) => {
                write!(f, "unsupported shell {n}, please, pick 1-{}", Shell::ALL.len())
            }
            CommandError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError::Config(e)
    }
}

impl From<HistoryError> for CommandError {
    fn from(e: HistoryError) -> Self {
        CommandError::History(e)
    }
}

impl From<InstallError> for CommandError {
    fn from(e: InstallError) -> Self {
        CommandError::Install(e)
    }
}

impl From<PromptError> for CommandError {
    fn from(e: PromptError) -> Self {
        CommandError::Prompt(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

// ============================================================================
// History
// ============================================================================

/// Prints every directory, most recent first, optionally prefixed with
/// `<timestamp>\t`.
pub fn list(history: &History, with_time: bool, out: &mut dyn Write) -> Result<(), CommandError> {
    for entry in history.list() {
        if with_time {
            write!(
                out,
                "{}\t",
                entry.stored_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
        }
        writeln!(out, "{}", entry.path)?;
    }
    out.flush()?;
    Ok(())
}

/// Records `dir` now. Empty or ignored directories are silently skipped.
pub fn put(history: &mut History, dir: &str) -> Result<(), CommandError> {
    if history.put(dir, Utc::now()) {
        history.save()?;
        debug!("Stored {}", dir.trim());
    }
    Ok(())
}

pub fn remove(history: &mut History, dir: &str) -> Result<(), CommandError> {
    if history.remove(dir) {
        history.save()?;
        info!("Removed {dir} from {}", history.path().display());
    }
    Ok(())
}

pub fn prune(history: &mut History, dry: bool, out: &mut dyn Write) -> Result<(), CommandError> {
    let pruned = history.prune(dry);
    for (path, reason) in &pruned {
        writeln!(out, "{reason} {path}")?;
    }
    out.flush()?;
    if !dry && !pruned.is_empty() {
        history.save()?;
    }
    Ok(())
}

/// Patterns are quoted so leading or trailing spaces stay visible.
pub fn ignore_list(history: &History, out: &mut dyn Write) -> Result<(), CommandError> {
    for pattern in history.ignores() {
        writeln!(out, "'{pattern}'")?;
    }
    out.flush()?;
    Ok(())
}

pub fn ignore_put(history: &mut History, pattern: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    if pattern.is_empty() {
        writeln!(out, "Usage: changedir ignore put <regexp>")?;
        return Ok(());
    }
    if history.ignore_put(pattern) {
        history.save()?;
    }
    Ok(())
}

pub fn ignore_remove(history: &mut History, pattern: &str) -> Result<(), CommandError> {
    if !pattern.is_empty() && history.ignore_remove(pattern) {
        history.save()?;
    }
    Ok(())
}

pub fn ignore_apply(history: &mut History, dry: bool, out: &mut dyn Write) -> Result<(), CommandError> {
    let removed = history.ignore_apply(dry);
    for path in &removed {
        writeln!(out, "{path}")?;
    }
    out.flush()?;
    if !dry && !removed.is_empty() {
        history.save()?;
    }
    Ok(())
}

// ============================================================================
// Install
// ============================================================================

/// Asks which shell to use when `shell` is `None`, then runs the
/// interactive installer for it.
pub fn install(
    term: &mut dyn Terminal,
    shell: Option<Shell>,
    config: &ResolvedConfig,
) -> Result<Outcome, CommandError> {
    let shell = match shell {
        Some(shell) => shell,
        None => pick_shell(term)?,
    };
    let config_dir = match shell {
        Shell::Fish => &config.fish_config_dir,
    };
    info!("Installing {shell} integration into {}", config_dir.display());

    let mut files = shell.files(config_dir);
    Ok(install::run(term, &mut files)?)
}

fn pick_shell(term: &mut dyn Terminal) -> Result<Shell, CommandError> {
    term.write_line(&StyledText::plain_text(
        "Installation is available for the following shells:",
    ))?;
    for (i, shell) in Shell::ALL.iter().enumerate() {
        term.write_line(&StyledText::plain_text(format!("{}) {shell}", i + 1)))?;
    }
    let choice = ask_int(term, "Which shell do you want to install files for? ", 0)?;
    Shell::from_menu(choice).ok_or(CommandError::UnsupportedShell(choice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ChangedirConfig, resolve};
    use crate::test_support::ScriptedTerminal;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn history_in(dir: &Path) -> History {
        History::open(dir.join("history.json")).unwrap()
    }

    fn config_with_fish(dir: &Path) -> ResolvedConfig {
        let mut config = resolve(&ChangedirConfig::default(), Some(dir.join("h.json").as_path()));
        config.fish_config_dir = dir.join("fish");
        config
    }

    #[test]
    fn test_put_then_list_persists() {
        let dir = tempdir().unwrap();
        let mut history = history_in(dir.path());
        put(&mut history, "/home/me").unwrap();
        drop(history);

        let reopened = history_in(dir.path());
        let mut out: Vec<u8> = Vec::new();
        list(&reopened, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/home/me\n");
    }

    #[test]
    fn test_list_with_time_is_tab_separated() {
        let dir = tempdir().unwrap();
        let mut history = history_in(dir.path());
        put(&mut history, "/home/me").unwrap();

        let mut out: Vec<u8> = Vec::new();
        list(&history, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let (time, path) = text.trim_end().split_once('\t').unwrap();
        assert_eq!(path, "/home/me");
        assert!(time.ends_with('Z'));
    }

    #[test]
    fn test_put_empty_does_not_create_file() {
        let dir = tempdir().unwrap();
        let mut history = history_in(dir.path());
        put(&mut history, "  ").unwrap();
        assert!(!dir.path().join("history.json").exists());
    }

    #[test]
    fn test_prune_output() {
        let dir = tempdir().unwrap();
        let mut history = history_in(dir.path());
        let gone = dir.path().join("gone").display().to_string();
        put(&mut history, &gone).unwrap();

        let mut out: Vec<u8> = Vec::new();
        prune(&mut history, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("[MISSING] {gone}\n"));
        drop(history);
        assert!(history_in(dir.path()).list().is_empty());
    }

    #[test]
    fn test_ignore_commands() {
        let dir = tempdir().unwrap();
        let mut history = history_in(dir.path());
        put(&mut history, "/tmp/x").unwrap();

        let mut out: Vec<u8> = Vec::new();
        ignore_put(&mut history, "", &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Usage:"));

        ignore_put(&mut history, "^/tmp ", &mut io::sink()).unwrap();
        drop(history);
        let mut history = history_in(dir.path());
        let mut out: Vec<u8> = Vec::new();
        ignore_list(&history, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "'^/tmp '\n");

        ignore_remove(&mut history, "^/tmp ").unwrap();
        ignore_put(&mut history, "^/tmp/", &mut io::sink()).unwrap();
        let mut out: Vec<u8> = Vec::new();
        ignore_apply(&mut history, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/tmp/x\n");
        drop(history);
        assert!(history_in(dir.path()).list().is_empty());
    }

    #[test]
    fn test_install_picks_shell_from_menu() {
        let dir = tempdir().unwrap();
        let config = config_with_fish(dir.path());
        let mut term = ScriptedTerminal::new("1\ny");

        let outcome = install(&mut term, None, &config).unwrap();
        assert_eq!(outcome, Outcome::AppliedAll(3));
        assert!(term.output.starts_with("Installation is available"));
        assert!(term.output.contains("1) fish"));
        let cd = fs::read_to_string(dir.path().join("fish/functions/cd.fish")).unwrap();
        assert!(cd.starts_with("function cd --wraps cd"));
    }

    #[test]
    fn test_install_rejects_unknown_shell() {
        let dir = tempdir().unwrap();
        let config = config_with_fish(dir.path());
        let mut term = ScriptedTerminal::new("\n");

        let err = install(&mut term, None, &config).unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedShell(0)));
        assert!(!dir.path().join("fish").exists());
    }

    #[test]
    fn test_install_second_run_is_already_installed() {
        let dir = tempdir().unwrap();
        let config = config_with_fish(dir.path());
        install(&mut ScriptedTerminal::new("y"), Some(Shell::Fish), &config).unwrap();

        let mut term = ScriptedTerminal::new("");
        let outcome = install(&mut term, Some(Shell::Fish), &config).unwrap();
        assert_eq!(outcome, Outcome::AlreadyInstalled);
    }
}
