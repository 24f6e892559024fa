use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::prompt::PromptError;

/// Errors that abort an installation batch.
///
/// Filesystem failures always carry the path they happened on so the
/// message printed on exit names the offending file.
#[derive(Debug)]
pub enum InstallError {
    /// stat/read/write/mkdir failed for `path`. "Not found" during
    /// preparation is a normal state and never ends up here.
    Io { path: PathBuf, source: io::Error },
    /// The user gave an answer outside the accepted alphabet, or the
    /// terminal could not be driven.
    Prompt(PromptError),
}

impl InstallError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        InstallError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            InstallError::Prompt(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstallError::Io { source, .. } => Some(source),
            InstallError::Prompt(e) => Some(e),
        }
    }
}

impl From<PromptError> for InstallError {
    fn from(e: PromptError) -> Self {
        InstallError::Prompt(e)
    }
}
