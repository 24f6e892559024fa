//! # Styled Text
//!
//! Output is built as plain strings tagged with a [`Style`], not as escape
//! sequences. Layout code measures the plain text, and only the terminal
//! adapter turns tags into colors. That keeps column widths honest: a red
//! "Overwrite:" is as wide as a plain one.
//!
//! ```text
//! StyledText ── plain() ──► "Overwrite: \"/a\""      measured here
//!      │
//!      └──── Terminal::write_styled() ──► ESC[31mOverwrite:ESC[0m "/a"
//! ```

use unicode_width::UnicodeWidthStr;

/// Foreground colors used by the installer. Kept small on purpose so any
/// terminal backend can map them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Cyan,
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub tone: Option<Tone>,
    pub bold: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        tone: None,
        bold: false,
    };

    pub fn tone(tone: Tone) -> Self {
        Self {
            tone: Some(tone),
            bold: false,
        }
    }

    pub fn bold() -> Self {
        Self {
            tone: None,
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// A run of spans, usually one line without its trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    pub spans: Vec<Span>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::new().push(text, Style::PLAIN)
    }

    pub fn push(mut self, text: impl Into<String>, style: Style) -> Self {
        self.spans.push(Span {
            text: text.into(),
            style,
        });
        self
    }

    pub fn append(mut self, other: StyledText) -> Self {
        self.spans.extend(other.spans);
        self
    }

    /// Text with every tag stripped.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Visible width in terminal columns, ignoring styles.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.width()).sum()
    }

    /// Pads with spaces up to `width` visible columns.
    pub fn padded(self, width: usize) -> Self {
        let fill = width.saturating_sub(self.width());
        if fill == 0 {
            return self;
        }
        self.push(" ".repeat(fill), Style::PLAIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_ignores_styles() {
        let styled = StyledText::new()
            .push("Overwrite:", Style::tone(Tone::Red))
            .push(" \"/a\"", Style::PLAIN);
        assert_eq!(styled.plain(), "Overwrite: \"/a\"");
        assert_eq!(styled.width(), 15);
    }

    #[test]
    fn test_width_counts_columns_not_bytes() {
        let styled = StyledText::plain_text("▶ héllo");
        assert_eq!(styled.width(), 7);
        assert!(styled.plain().len() > 7);
    }

    #[test]
    fn test_padded_fills_to_width() {
        let padded = StyledText::new().push("ab", Style::bold()).padded(5);
        assert_eq!(padded.plain(), "ab   ");
        assert_eq!(padded.spans[0].style, Style::bold());
        assert_eq!(padded.spans[1].style, Style::PLAIN);
    }

    #[test]
    fn test_padded_never_truncates() {
        let padded = StyledText::plain_text("abcdef").padded(3);
        assert_eq!(padded.plain(), "abcdef");
        assert_eq!(padded.spans.len(), 1);
    }
}
