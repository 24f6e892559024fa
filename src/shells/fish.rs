//! Fish shell integration: a `cd` wrapper that records history, an fzf
//! picker over that history, and a `Ctrl+L` binding for the picker.

use std::path::Path;

use crate::install::FileSpec;

const CD: &str = r#"
function cd --wraps cd --description "cd wrapper which records directories history"
    builtin cd $argv
    if status is-interactive
        changedir put $PWD
    end
end
"#;

const CD_INTERACTIVE: &str = r#"
function cd-interactive --description "go to directory based on history (interactive)"
    # clear the line and move cursor to the beginning of the line (less flickering in some terminals)
    echo -ne "\033[2K\r"
    set -l destdir (changedir list | fzf --scheme=path --reverse --no-sort --no-info)
    if test $status -eq 0
        cd $destdir
    end
    commandline -f repaint
end
"#;

const CONFIG: &str = r#"
if status is-interactive
    bind \cl cd-interactive
end
"#;

/// `config_dir` is fish's own directory, usually `~/.config/fish`.
pub fn files(config_dir: &Path) -> Vec<FileSpec> {
    vec![
        FileSpec::write(config_dir.join("functions").join("cd.fish"), CD),
        FileSpec::write(
            config_dir.join("functions").join("cd-interactive.fish"),
            CD_INTERACTIVE,
        ),
        FileSpec::append(config_dir.join("config.fish"), CONFIG),
    ]
}
