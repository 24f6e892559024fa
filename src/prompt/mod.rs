//! # Prompts
//!
//! Single-keystroke and line prompts on top of a small [`Terminal`]
//! capability. The decision logic never talks to a real tty, so tests drive
//! it with scripted bytes.
//!
//! ```text
//!   ask_yes_no / ask_choice          ask_int
//!            │                          │
//!            ▼                          │
//!        ask_byte                       │
//!   raw on → label → read 1 byte        │
//!   → raw off (always) → handler        │
//!            │                          │
//!            └──────────┬───────────────┘
//!                       ▼
//!                 dyn Terminal
//!        (CrosstermTerminal | scripted fake)
//! ```
//!
//! ## Failure Model
//!
//! An answer outside the accepted alphabet is an error, never a silent
//! default and never a re-prompt. Bare Enter (`\n` or `\r`) is the only way
//! to pick the default.

pub mod style;
pub mod terminal;

use std::fmt;
use std::io;

use log::debug;

use style::{Style, StyledText, Tone};

pub use terminal::CrosstermTerminal;

/// Everything a prompt needs from the controlling terminal.
///
/// `enter_raw_mode` / `restore_mode` bracket a single-byte read. Writes
/// happen in both modes, so implementations must not rely on line
/// discipline for output.
pub trait Terminal {
    fn enter_raw_mode(&mut self) -> io::Result<()>;
    fn restore_mode(&mut self) -> io::Result<()>;
    /// Blocks until one byte is available.
    fn read_byte(&mut self) -> io::Result<u8>;
    /// Reads through the next `\n`. Returns an empty string at end of input.
    fn read_line(&mut self) -> io::Result<String>;
    /// Writes styled text as-is, without adding a newline.
    fn write_styled(&mut self, text: &StyledText) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;

    fn write_line(&mut self, text: &StyledText) -> io::Result<()> {
        self.write_styled(text)?;
        self.write_styled(&StyledText::plain_text("\n"))
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum PromptError {
    /// Entering or leaving raw mode failed.
    Terminal(io::Error),
    /// Reading input or writing the prompt failed.
    Io(io::Error),
    /// Standard input closed before an answer arrived.
    UnexpectedEof,
    /// A keystroke outside the accepted alphabet.
    InvalidResponse { byte: u8, expected: String },
    /// A line that is not a base-10 integer.
    InvalidNumber(String),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Terminal(e) => write!(f, "terminal error: {e}"),
            PromptError::Io(e) => write!(f, "prompt I/O error: {e}"),
            PromptError::UnexpectedEof => write!(f, "input closed before an answer was given"),
            PromptError::InvalidResponse { byte, expected } => {
                write!(
                    f,
                    "invalid response {}, please, use {expected}",
                    (*byte as char).escape_default()
                )
            }
            PromptError::InvalidNumber(text) => write!(f, "invalid number: {text:?}"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::Terminal(e) | PromptError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::Io(e)
    }
}

// ============================================================================
// Primitives
// ============================================================================

/// `▶ text` with the arrow in cyan and the text in bold.
pub fn label(text: &str) -> StyledText {
    StyledText::new()
        .push("▶ ", Style::tone(Tone::Cyan))
        .push(text, Style::bold())
}

/// Reads one keystroke in raw mode.
///
/// The terminal is restored on every path before `on_response` runs.
/// `\n` and `\r` become `default`. `on_response` validates the byte and
/// echoes an acknowledgment; its error is returned as-is.
pub fn ask_byte<F>(
    term: &mut dyn Terminal,
    text: &str,
    hint: &str,
    default: u8,
    on_response: F,
) -> Result<u8, PromptError>
where
    F: FnOnce(&mut dyn Terminal, u8) -> Result<(), PromptError>,
{
    term.enter_raw_mode().map_err(PromptError::Terminal)?;
    let read = read_raw(term, text, hint);
    let restored = term.restore_mode();

    let byte = read?;
    restored.map_err(PromptError::Terminal)?;

    let byte = match byte {
        b'\n' | b'\r' => default,
        other => other,
    };
    debug!("Prompt {text:?} answered with {:?}", byte as char);
    on_response(term, byte)?;
    Ok(byte)
}

fn read_raw(term: &mut dyn Terminal, text: &str, hint: &str) -> Result<u8, PromptError> {
    let mut prompt = label(text);
    if !hint.is_empty() {
        prompt = prompt.push(hint, Style::bold());
    }
    term.write_styled(&prompt)?;
    term.flush()?;
    term.read_byte().map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => PromptError::UnexpectedEof,
        _ => PromptError::Io(e),
    })
}

/// One accepted answer of a [`ask_choice`] prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Matched case-insensitively.
    pub key: u8,
    /// Echoed after the keystroke.
    pub echo: &'static str,
}

impl Choice {
    pub const fn new(key: u8, echo: &'static str) -> Self {
        Self { key, echo }
    }
}

/// Single-keystroke menu. Returns the matched choice's key, lowercased.
pub fn ask_choice(
    term: &mut dyn Terminal,
    text: &str,
    hint: &str,
    default: u8,
    choices: &[Choice],
) -> Result<u8, PromptError> {
    let byte = ask_byte(term, text, hint, default, |term, byte| {
        match find_choice(choices, byte) {
            Some(choice) => Ok(term.write_line(&StyledText::plain_text(choice.echo))?),
            None => {
                // Leave the cursor on a fresh line before the error is printed.
                term.write_line(&StyledText::new())?;
                Err(PromptError::InvalidResponse {
                    byte,
                    expected: describe_choices(choices),
                })
            }
        }
    })?;
    Ok(byte.to_ascii_lowercase())
}

fn find_choice(choices: &[Choice], byte: u8) -> Option<&Choice> {
    choices.iter().find(|c| c.key.eq_ignore_ascii_case(&byte))
}

/// `'y', 'n' or '?'`
fn describe_choices(choices: &[Choice]) -> String {
    let quoted: Vec<String> = choices
        .iter()
        .map(|c| format!("'{}'", c.key as char))
        .collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

pub const YES: Choice = Choice::new(b'y', "Yes");
pub const NO: Choice = Choice::new(b'n', "No");

/// `[Y/n]` or `[y/N]` prompt depending on `default`.
pub fn ask_yes_no(term: &mut dyn Terminal, text: &str, default: bool) -> Result<bool, PromptError> {
    let (default_byte, hint) = if default {
        (b'y', " [Y/n] ")
    } else {
        (b'n', " [y/N] ")
    };
    let answer = ask_choice(term, text, hint, default_byte, &[YES, NO])?;
    Ok(answer == b'y')
}

/// Reads a whole line in normal mode and parses it as a base-10 integer.
/// An empty (or all-whitespace) line yields `default`.
pub fn ask_int(term: &mut dyn Terminal, text: &str, default: i64) -> Result<i64, PromptError> {
    term.write_styled(&label(text))?;
    term.flush()?;

    let line = term.read_line()?;
    if line.is_empty() {
        return Err(PromptError::UnexpectedEof);
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| PromptError::InvalidNumber(trimmed.to_string()))
}
