//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io;

use crate::prompt::Terminal;
use crate::prompt::style::StyledText;

/// A terminal that replays scripted input and records everything else.
///
/// `events` logs mode switches, reads and writes in order so tests can
/// check that the terminal was restored before an answer was echoed.
#[derive(Default)]
pub struct ScriptedTerminal {
    input: VecDeque<u8>,
    /// Everything written, styles stripped.
    pub output: String,
    pub raw: bool,
    pub raw_entries: usize,
    pub events: Vec<String>,
    /// Make the matching call fail with an I/O error.
    pub fail_enter: bool,
    pub fail_restore: bool,
    pub fail_write: bool,
}

fn broken(what: &str) -> io::Error {
    io::Error::other(format!("{what} failed"))
}

impl ScriptedTerminal {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.bytes().collect(),
            ..Default::default()
        }
    }

    /// Number of single-keystroke prompts that were shown.
    pub fn prompts(&self) -> usize {
        self.raw_entries
    }
}

impl Terminal for ScriptedTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.fail_enter {
            return Err(broken("enter raw mode"));
        }
        self.raw = true;
        self.raw_entries += 1;
        self.events.push("raw".to_string());
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        self.events.push("restore".to_string());
        if self.fail_restore {
            return Err(broken("restore mode"));
        }
        self.raw = false;
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let byte = self
            .input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))?;
        self.events.push(format!("read:{}", byte as char));
        Ok(byte)
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = Vec::new();
        while let Some(byte) = self.input.pop_front() {
            line.push(byte);
            if byte == b'\n' {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn write_styled(&mut self, text: &StyledText) -> io::Result<()> {
        if self.fail_write {
            return Err(broken("write"));
        }
        let plain = text.plain();
        self.events.push(format!("write:{plain}"));
        self.output.push_str(&plain);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
