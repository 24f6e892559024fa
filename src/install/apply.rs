//! # Executor
//!
//! Writes prepared specs to disk, in order. Specs already installed are
//! skipped.
//!
//! There is no locking, no temp-file rename and no backup: a crash in the
//! middle of a write can leave a truncated or half-appended file, and an
//! error on spec *k* leaves specs before it applied. The decision to write
//! is based on the state seen by [`prepare`](super::prepare), so external
//! edits made between preparation and apply are overwritten.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::info;

use super::error::InstallError;
use super::spec::{Action, FileSpec};

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Applies every spec that is not installed yet, stopping at the first error.
///
/// `before_each` runs right before a spec is written (already-installed
/// specs included) so callers can report progress. Returns how many files
/// were mutated.
pub fn apply<F>(files: &[FileSpec], mut before_each: F) -> Result<usize, InstallError>
where
    F: FnMut(&FileSpec) -> Result<(), InstallError>,
{
    let mut mutated = 0;
    for file in files {
        before_each(file)?;
        if apply_file(file)? {
            mutated += 1;
        }
    }
    Ok(mutated)
}

/// Applies a single spec. Returns `false` when it was already installed.
pub fn apply_file(file: &FileSpec) -> Result<bool, InstallError> {
    if file.installed() {
        return Ok(false);
    }

    if let Some(parent) = file.path.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, e))?;
    }

    let result = match file.action {
        Action::Append if file.exists() => append_to(&file.path, file.normalized()),
        Action::Append | Action::Write => overwrite(&file.path, file.normalized()),
    };
    result.map_err(|e| InstallError::io(&file.path, e))?;

    info!("Applied {:?} to {}", file.action, file.path.display());
    Ok(true)
}

fn overwrite(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = open_options().write(true).create(true).truncate(true).open(path)?;
    file.write_all(data)?;
    file.flush()
}

/// Separates the appended block from existing content with one newline.
fn append_to(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file: File = open_options().append(true).open(path)?;
    file.write_all(b"\n")?;
    file.write_all(data)?;
    file.flush()
}

fn open_options() -> OpenOptions {
    #[allow(unused_mut)]
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options
}
