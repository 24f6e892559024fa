//! # Shell Integrations
//!
//! Each supported shell turns into an ordered list of [`FileSpec`]s for the
//! installer. The order is the order the user is asked in.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::install::FileSpec;

pub mod fish;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Fish,
}

impl Shell {
    /// Shells in menu order; the menu is 1-based.
    pub const ALL: [Shell; 1] = [Shell::Fish];

    /// Maps a 1-based menu answer back to a shell.
    pub fn from_menu(choice: i64) -> Option<Shell> {
        let index = usize::try_from(choice).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Files to install, rooted at the shell's configuration directory.
    pub fn files(self, config_dir: &Path) -> Vec<FileSpec> {
        match self {
            Shell::Fish => fish::files(config_dir),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shell::Fish => write!(f, "fish"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_menu() {
        assert_eq!(Shell::from_menu(1), Some(Shell::Fish));
        assert_eq!(Shell::from_menu(0), None);
        assert_eq!(Shell::from_menu(2), None);
        assert_eq!(Shell::from_menu(-1), None);
    }
}
