//! # Renderer
//!
//! Pure presentation for install batches. Nothing here touches the disk or
//! the terminal; functions return [`StyledText`] lines for the caller to
//! print.
//!
//! ## Preview Box
//!
//! ```text
//! ╔══════════════════════════════╗
//! ║ Create: "/home/u/a.fish"     ║
//! ╟┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄╢
//! ║ function cd --wraps cd       ║
//! ║ end                          ║
//! ╠══════════════════════════════╣
//! ║ Append to: "/home/u/c.fish"  ║
//! ╟┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄╢
//! ║ bind \cl cd-interactive      ║
//! ╚══════════════════════════════╝
//! ```
//!
//! Every row is padded to the widest summary or content line of the whole
//! batch, measured without styles.

use crate::prompt::style::{Style, StyledText, Tone};

use super::spec::{Action, FileSpec};

/// What will happen to a file, colored by how destructive it is.
pub fn summary(file: &FileSpec) -> StyledText {
    let (label, tone) = if file.installed() {
        ("Already installed:", Tone::Green)
    } else if file.action == Action::Append {
        ("Append to:", Tone::Yellow)
    } else if file.exists() {
        ("Overwrite:", Tone::Red)
    } else {
        ("Create:", Tone::Green)
    };
    StyledText::new()
        .push(label, Style::tone(tone))
        .push(format!(" {:?}", file.path), Style::PLAIN)
}

/// Progress line printed while a file is being applied.
pub fn action_line(file: &FileSpec) -> StyledText {
    let text = if file.installed() {
        format!("File {:?} is already installed", file.path)
    } else if file.action == Action::Append {
        format!("Appending data to file {:?}", file.path)
    } else if file.exists() {
        format!("Overwriting the file {:?}", file.path)
    } else {
        format!("Creating the file {:?}", file.path)
    };
    StyledText::plain_text(text)
}

fn content_width(file: &FileSpec) -> usize {
    file.content_lines()
        .map(|line| StyledText::plain_text(line).width())
        .chain(std::iter::once(summary(file).width()))
        .max()
        .unwrap_or(0)
}

fn rule(left: char, fill: char, right: char, width: usize) -> StyledText {
    let mut line = String::with_capacity((width + 4) * 3);
    line.push(left);
    line.extend(std::iter::repeat_n(fill, width + 2));
    line.push(right);
    StyledText::plain_text(line)
}

fn row(content: StyledText, width: usize) -> StyledText {
    StyledText::plain_text("║ ")
        .append(content.padded(width))
        .push(" ║", Style::PLAIN)
}

/// Boxed preview of every file in `files`, in order.
pub fn preview(files: &[FileSpec]) -> Vec<StyledText> {
    let width = files.iter().map(content_width).max().unwrap_or(0);

    let mut lines = vec![rule('╔', '═', '╗', width)];
    for (i, file) in files.iter().enumerate() {
        if i != 0 {
            lines.push(rule('╠', '═', '╣', width));
        }
        lines.push(row(summary(file), width));
        lines.push(rule('╟', '┄', '╢', width));
        for line in file.content_lines() {
            lines.push(row(StyledText::plain_text(line), width));
        }
    }
    lines.push(rule('╚', '═', '╝', width));
    lines
}
