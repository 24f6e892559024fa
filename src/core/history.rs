//! # Directory History
//!
//! Visited directories and the ignore list, stored as a single JSON
//! document (`history.json` in the data directory):
//!
//! ```json
//! {
//!   "directories": { "/home/me/src": "2026-10-18T09:12:44Z" },
//!   "ignores": ["^/tmp"]
//! }
//! ```
//!
//! A directory maps to the last time it was stored, so `list` can show the
//! most recent first. Ignore entries are regular expressions; ones that do
//! not compile are kept but never match.
//!
//! Every `cd` in every interactive shell runs `changedir put`, so opening a
//! history takes an exclusive lock on `<file>.lock` and keeps it until the
//! [`History`] is dropped. Read, change and save happen under that lock.
//! Saves write a per-process temp file and `rename()` it into place.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug)]
struct HistoryData {
    #[serde(default)]
    directories: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    ignores: BTreeSet<String>,
}

/// One stored directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub stored_at: DateTime<Utc>,
}

/// Why `prune` dropped an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    Missing,
    NotADirectory,
}

impl fmt::Display for PruneReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruneReason::Missing => write!(f, "[MISSING]"),
            PruneReason::NotADirectory => write!(f, "[NOTADIR]"),
        }
    }
}

#[derive(Debug)]
pub enum HistoryError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Io { path, source } => {
                write!(f, "history I/O error ({}): {source}", path.display())
            }
            HistoryError::Parse { path, source } => {
                write!(f, "history parse error ({}): {source}", path.display())
            }
        }
    }
}

impl std::error::Error for HistoryError {}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> HistoryError + '_ {
    move |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The history document plus where it came from.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    data: HistoryData,
    /// Released when the file is closed.
    _lock: Option<File>,
}

impl History {
    /// Locks and loads the history at `path`. A missing file is an empty
    /// history. Blocks while another process holds the lock.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let lock = lock_exclusive(&path)?;
        let data = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| HistoryError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HistoryData::default(),
            Err(e) => return Err(io_error(&path)(e)),
        };
        debug!(
            "Opened history {} ({} directories, {} ignores)",
            path.display(),
            data.directories.len(),
            data.ignores.len()
        );
        Ok(Self {
            path,
            data,
            _lock: Some(lock),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically writes the document back, creating the parent directory.
    pub fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        atomic_write_json(&self.path, &self.data).map_err(io_error(&self.path))
    }

    /// Records `dir` at `now` unless it is empty or ignored.
    /// Returns whether the history changed.
    pub fn put(&mut self, dir: &str, now: DateTime<Utc>) -> bool {
        let dir = dir.trim();
        if dir.is_empty() {
            return false;
        }
        if self.compiled_ignores().iter().any(|re| re.is_match(dir)) {
            debug!("Ignoring {dir}");
            return false;
        }
        self.data.directories.insert(dir.to_string(), now);
        true
    }

    /// All entries, most recently stored first.
    pub fn list(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .data
            .directories
            .iter()
            .map(|(path, stored_at)| Entry {
                path: path.clone(),
                stored_at: *stored_at,
            })
            .collect();
        entries.sort_by(|a, b| b.stored_at.cmp(&a.stored_at).then_with(|| a.path.cmp(&b.path)));
        entries
    }

    pub fn remove(&mut self, dir: &str) -> bool {
        if dir.is_empty() {
            return false;
        }
        self.data.directories.remove(dir).is_some()
    }

    /// Finds entries that no longer point at a directory and, unless `dry`,
    /// drops them.
    pub fn prune(&mut self, dry: bool) -> Vec<(String, PruneReason)> {
        let stale: Vec<(String, PruneReason)> = self
            .data
            .directories
            .keys()
            .filter_map(|path| {
                let reason = match fs::metadata(path) {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => PruneReason::Missing,
                    Ok(meta) if !meta.is_dir() => PruneReason::NotADirectory,
                    _ => return None,
                };
                Some((path.clone(), reason))
            })
            .collect();

        if !dry {
            for (path, _) in &stale {
                self.data.directories.remove(path);
            }
            info!("Pruned {} directories", stale.len());
        }
        stale
    }

    pub fn ignores(&self) -> impl Iterator<Item = &str> {
        self.data.ignores.iter().map(String::as_str)
    }

    /// Stored as given; validity is only checked when the list is used.
    pub fn ignore_put(&mut self, pattern: &str) -> bool {
        self.data.ignores.insert(pattern.to_string())
    }

    pub fn ignore_remove(&mut self, pattern: &str) -> bool {
        self.data.ignores.remove(pattern)
    }

    /// Finds stored directories matched by the ignore list and, unless
    /// `dry`, drops them.
    pub fn ignore_apply(&mut self, dry: bool) -> Vec<String> {
        let regexes = self.compiled_ignores();
        let matched: Vec<String> = self
            .data
            .directories
            .keys()
            .filter(|path| regexes.iter().any(|re| re.is_match(path)))
            .cloned()
            .collect();

        if !dry {
            for path in &matched {
                self.data.directories.remove(path);
            }
            info!("Removed {} ignored directories", matched.len());
        }
        matched
    }

    fn compiled_ignores(&self) -> Vec<Regex> {
        self.data
            .ignores
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    debug!("Skipping invalid ignore pattern {pattern:?}: {e}");
                    None
                }
            })
            .collect()
    }
}

/// `<history>.lock` next to the history file, created with its directory.
fn lock_exclusive(path: &Path) -> Result<File, HistoryError> {
    let lock_path = path.with_extension("lock");
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(io_error(&lock_path))?;
    file.lock_exclusive().map_err(io_error(&lock_path))?;
    debug!("Locked {}", lock_path.display());
    Ok(file)
}

/// Atomically write `data` as JSON to `path` (via a per-process temp file
/// + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension(format!("tmp.{}", process::id()));
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
