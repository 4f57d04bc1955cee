//! Print directives
//!
//! A receipt is an ordered list of directives. The printer is stateful and
//! executes them in sequence, so order matters: a style change applies to
//! every following `Text` until it is changed again.

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// Bold emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    On,
    Off,
}

/// Character size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    DoubleWidthHeight,
}

/// A single printer instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintDirective {
    /// Raw text. Line breaks are embedded by the producer (`"line\n"`).
    Text(String),
    SetAlignment(Alignment),
    SetEmphasis(Emphasis),
    SetSize(TextSize),
    /// Feed `n` blank lines
    FeedLines(u8),
    /// Full paper cut
    CutPaper,
}

impl PrintDirective {
    /// Text directive terminated with a newline
    pub fn line(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();
        let mut content = String::with_capacity(s.len() + 1);
        content.push_str(s);
        content.push('\n');
        PrintDirective::Text(content)
    }
}
