use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use changedir::install::{self, Action, FileSpec, InstallError, Outcome, prepare};
use changedir::prompt::style::StyledText;
use changedir::prompt::{PromptError, Terminal};
use changedir::shells::Shell;
use tempfile::tempdir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Replays keystrokes and keeps a plain-text transcript of the output.
struct FakeTerminal {
    input: VecDeque<u8>,
    transcript: String,
    raw: bool,
    prompts: Vec<String>,
}

impl FakeTerminal {
    fn new(keys: &str) -> Self {
        Self {
            input: keys.bytes().collect(),
            transcript: String::new(),
            raw: false,
            prompts: Vec::new(),
        }
    }
}

impl Terminal for FakeTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        assert!(!self.raw, "raw mode entered twice");
        self.raw = true;
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        self.raw = false;
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"))
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        while let Some(byte) = self.input.pop_front() {
            line.push(byte as char);
            if byte == b'\n' {
                break;
            }
        }
        Ok(line)
    }

    fn write_styled(&mut self, text: &StyledText) -> io::Result<()> {
        let plain = text.plain();
        if self.raw {
            self.prompts.push(plain.clone());
        }
        self.transcript.push_str(&plain);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// Preparation and Apply
// ============================================================================

#[test]
fn test_write_to_missing_path_then_reprepare() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a");
    let mut files = vec![FileSpec::write(&path, "  hi  \n\n")];

    prepare(&mut files).unwrap();
    assert!(!files[0].exists());
    assert!(!files[0].installed());

    install::apply::apply(&files, |_| Ok(())).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"hi\n");

    prepare(&mut files).unwrap();
    assert!(files[0].exists());
    assert!(files[0].installed());
    assert_eq!(install::apply::apply(&files, |_| Ok(())).unwrap(), 0);
}

#[test]
fn test_append_detects_snippet_added_by_hand() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("b");
    fs::write(&path, "other\nline\n").unwrap();
    let mut files = vec![FileSpec::append(&path, "line")];

    prepare(&mut files).unwrap();
    assert!(files[0].installed());
    assert_eq!(files[0].action, Action::Append);
}

#[test]
fn test_append_mutation_leaves_prior_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.fish");
    fs::write(&path, "set -x EDITOR vim\n").unwrap();
    let mut files = vec![FileSpec::append(&path, "bind \\cl cd-interactive")];

    prepare(&mut files).unwrap();
    install::apply::apply(&files, |_| Ok(())).unwrap();
    assert_eq!(
        read(&path),
        "set -x EDITOR vim\n\nbind \\cl cd-interactive\n"
    );
}

// ============================================================================
// Interactive Workflow
// ============================================================================

#[test]
fn test_step_by_step_accepts_first_declines_second() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.fish");
    let second = dir.path().join("second.fish");
    let mut files = vec![FileSpec::write(&first, "one"), FileSpec::write(&second, "two")];
    let mut term = FakeTerminal::new("?syn");

    let outcome = install::run(&mut term, &mut files).unwrap();

    assert_eq!(outcome, Outcome::SteppedThrough { applied: 1, skipped: 1 });
    assert_eq!(read(&first), "one\n");
    assert!(!second.exists());
    assert!(!term.raw);
}

#[test]
fn test_out_of_alphabet_key_fails_without_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a");
    let mut files = vec![FileSpec::write(&path, "x")];
    let mut term = FakeTerminal::new("x");

    let err = install::run(&mut term, &mut files).unwrap_err();

    assert!(matches!(
        err,
        InstallError::Prompt(PromptError::InvalidResponse { byte: b'x', .. })
    ));
    assert!(err.to_string().contains("'y', 'n' or '?'"));
    assert!(!path.exists());
    assert!(!term.raw);
}

#[test]
fn test_prompt_order_follows_batch_order() {
    let dir = tempdir().unwrap();
    let names = ["a.fish", "b.fish", "c.fish"];

    let mut forward: Vec<FileSpec> = names
        .iter()
        .map(|n| FileSpec::write(dir.path().join(n), *n))
        .collect();
    let mut term = FakeTerminal::new("?snnn");
    install::run(&mut term, &mut forward).unwrap();
    let forward_order = previews_in_order(&term.transcript, &names);

    let mut backward: Vec<FileSpec> = names
        .iter()
        .rev()
        .map(|n| FileSpec::write(dir.path().join(n), *n))
        .collect();
    let mut term = FakeTerminal::new("?snnn");
    install::run(&mut term, &mut backward).unwrap();
    let backward_order = previews_in_order(&term.transcript, &names);

    assert_eq!(forward_order, vec!["a.fish", "b.fish", "c.fish"]);
    assert_eq!(backward_order, vec!["c.fish", "b.fish", "a.fish"]);
    assert_eq!(term.prompts.len(), 5);
}

/// Names in the order their step-by-step previews appear.
fn previews_in_order<'a>(transcript: &str, names: &[&'a str]) -> Vec<&'a str> {
    let steps = &transcript[transcript.find("Step by step").unwrap()..];
    let mut found: Vec<(usize, &str)> = names
        .iter()
        .map(|n| (steps.find(&format!("{n}\"")).unwrap(), *n))
        .collect();
    found.sort();
    found.into_iter().map(|(_, n)| n).collect()
}

#[test]
fn test_fish_install_end_to_end() {
    let dir = tempdir().unwrap();
    let fish = dir.path().join("fish");
    fs::create_dir_all(&fish).unwrap();
    fs::write(fish.join("config.fish"), "# mine\n").unwrap();

    let mut files = Shell::Fish.files(&fish);
    let mut term = FakeTerminal::new("y");
    assert_eq!(install::run(&mut term, &mut files).unwrap(), Outcome::AppliedAll(3));

    assert!(term.transcript.contains("Create: "));
    assert!(term.transcript.contains("Append to: "));
    assert!(read(&fish.join("config.fish")).starts_with("# mine\n\nif status is-interactive"));

    let mut again = Shell::Fish.files(&fish);
    let mut term = FakeTerminal::new("");
    assert_eq!(install::run(&mut term, &mut again).unwrap(), Outcome::AlreadyInstalled);
    assert!(term.prompts.is_empty());
}
