//! # Crossterm Terminal
//!
//! The real [`Terminal`]: raw mode through crossterm, bytes from stdin,
//! styled text to stdout.
//!
//! This is the only place that knows about escape sequences. Everything
//! above it deals in [`StyledText`].

use std::io::{self, BufRead, Read, Stdout, Write};

use crossterm::style::{Attribute, Color, ContentStyle};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::debug;

use super::Terminal;
use super::style::{Style, StyledText, Tone};

pub struct CrosstermTerminal {
    stdout: Stdout,
    color: bool,
}

impl CrosstermTerminal {
    /// `color = false` prints the same text with every style dropped.
    pub fn new(color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            color,
        }
    }
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.tone.map(|tone| match tone {
        Tone::Cyan => Color::Cyan,
        Tone::Green => Color::Green,
        Tone::Yellow => Color::Yellow,
        Tone::Red => Color::Red,
    });
    if style.bold {
        content.attributes.set(Attribute::Bold);
    }
    content
}

#[cfg(unix)]
fn read_unbuffered(buf: &mut [u8]) -> io::Result<usize> {
    use std::os::fd::AsFd;

    read_from_fd(io::stdin().as_fd(), buf)
}

/// Reads through a duplicate of `fd`; the file offset is shared with it.
#[cfg(unix)]
fn read_from_fd(fd: std::os::fd::BorrowedFd<'_>, buf: &mut [u8]) -> io::Result<usize> {
    std::fs::File::from(fd.try_clone_to_owned()?).read(buf)
}

#[cfg(not(unix))]
fn read_unbuffered(buf: &mut [u8]) -> io::Result<usize> {
    io::stdin().lock().read(buf)
}

impl Terminal for CrosstermTerminal {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        debug!("Raw mode enabled");
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        debug!("Raw mode disabled");
        Ok(())
    }

    /// One `read(2)` of one byte, so keys typed ahead stay queued on the
    /// tty for whoever reads next.
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        match read_unbuffered(&mut buf)? {
            0 => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed",
            )),
            _ => Ok(buf[0]),
        }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }

    fn write_styled(&mut self, text: &StyledText) -> io::Result<()> {
        let mut out = self.stdout.lock();
        for span in &text.spans {
            if self.color && span.style != Style::PLAIN {
                write!(out, "{}", content_style(span.style).apply(span.text.as_str()))?;
            } else {
                out.write_all(span.text.as_bytes())?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
