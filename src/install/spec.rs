//! # File Install Specs
//!
//! A [`FileSpec`] describes one target file: where it lives, what it should
//! contain, and whether that content replaces the file or gets appended.
//!
//! ```text
//! collaborator ──► FileSpec { path, content, action }
//!                      │
//!                  prepare()      reads the disk, never writes
//!                      │
//!                      ▼
//!                  FileSpec { .., normalized, exists, installed }
//! ```
//!
//! ## Installed State
//!
//! | Action   | installed when                                    |
//! |----------|---------------------------------------------------|
//! | `Write`  | on-disk bytes == normalized content               |
//! | `Append` | on-disk bytes contain normalized content anywhere |
//!
//! The append rule is looser on purpose: a file the user already edited by
//! hand to include the snippet counts as installed.
//!
//! Computed fields are a snapshot. Nothing refreshes them after
//! [`apply`](super::apply), so callers that need the post-apply state must
//! call [`prepare`] again.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

use super::error::InstallError;

/// How the desired content is installed into the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Replace the whole file.
    Write,
    /// Add to the end of the file, keeping what is already there.
    Append,
}

/// One target file plus the state derived from the disk during preparation.
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: PathBuf,
    /// Template text as supplied, untrimmed.
    pub content: String,
    pub action: Action,
    normalized: Vec<u8>,
    exists: bool,
    installed: bool,
}

impl FileSpec {
    pub fn new(action: Action, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            action,
            normalized: Vec::new(),
            exists: false,
            installed: false,
        }
    }

    pub fn write(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(Action::Write, path, content)
    }

    pub fn append(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(Action::Append, path, content)
    }

    /// Bytes that end up on disk. Empty until [`prepare`] has run.
    pub fn normalized(&self) -> &[u8] {
        &self.normalized
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn installed(&self) -> bool {
        self.installed
    }

    /// Lines shown in the preview box: the trimmed content split on `\n`.
    pub fn content_lines(&self) -> impl Iterator<Item = &str> {
        self.content.trim().split('\n')
    }

    /// Stats the target and classifies it. Only reads the filesystem.
    fn refresh(&mut self) -> Result<(), InstallError> {
        self.normalized = normalize(&self.content);
        self.installed = false;

        self.exists = match fs::metadata(&self.path) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(InstallError::io(&self.path, e)),
        };

        if self.exists {
            let on_disk = fs::read(&self.path).map_err(|e| InstallError::io(&self.path, e))?;
            self.installed = is_installed(self.action, &on_disk, &self.normalized);
        }

        debug!(
            "Prepared {} ({:?}): exists={}, installed={}",
            self.path.display(),
            self.action,
            self.exists,
            self.installed
        );
        Ok(())
    }
}

/// Trims surrounding whitespace and terminates with exactly one newline.
pub fn normalize(content: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 1);
    out.extend_from_slice(content.trim().as_bytes());
    out.push(b'\n');
    out
}

/// Applies the per-action content rule to bytes read from disk.
pub fn is_installed(action: Action, on_disk: &[u8], normalized: &[u8]) -> bool {
    match action {
        Action::Write => on_disk == normalized,
        Action::Append => contains(on_disk, normalized),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Computes the derived fields of every spec, in order.
///
/// Stops at the first stat or read error other than "not found". Safe to
/// call any number of times.
pub fn prepare(files: &mut [FileSpec]) -> Result<(), InstallError> {
    for file in files.iter_mut() {
        file.refresh()?;
    }
    Ok(())
}

/// True when no spec in the batch needs a change.
pub fn all_installed(files: &[FileSpec]) -> bool {
    files.iter().all(|f| f.installed)
}
