//! Code page conversion for receipt text
//!
//! Most network receipt printers shipped in Europe understand either UTF-8
//! or Windows-1252 (WPC1252, ESC/POS code table 16). Command bytes never pass
//! through here, only text content.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Character set the printer expects for text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodePage {
    /// Send text as UTF-8, no code table selection
    #[default]
    Utf8,
    /// Windows-1252, selected with `ESC t 16`
    Cp1252,
}

impl CodePage {
    /// `ESC t n` command selecting this code page, if one is needed
    pub fn select_command(self) -> Option<[u8; 3]> {
        match self {
            CodePage::Utf8 => None,
            CodePage::Cp1252 => Some([0x1B, 0x74, 16]),
        }
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePage::Utf8 => f.write_str("utf8"),
            CodePage::Cp1252 => f.write_str("cp1252"),
        }
    }
}

impl FromStr for CodePage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(CodePage::Utf8),
            "cp1252" | "windows-1252" | "wpc1252" => Ok(CodePage::Cp1252),
            other => Err(format!("unknown code page: {}", other)),
        }
    }
}

/// Encode text for the given code page
///
/// Characters the code page cannot represent are replaced with `?`.
pub fn encode_text(s: &str, code_page: CodePage) -> Cow<'_, [u8]> {
    match code_page {
        CodePage::Utf8 => Cow::Borrowed(s.as_bytes()),
        CodePage::Cp1252 => {
            let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.encode(s);
            if !had_errors {
                return cow;
            }

            // encoding_rs substitutes numeric character references; redo per char
            let mut out = Vec::with_capacity(s.len());
            let mut tmp = [0u8; 4];
            for c in s.chars() {
                let (bytes, _, unmappable) =
                    encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut tmp));
                if unmappable {
                    out.push(b'?');
                } else {
                    out.extend_from_slice(&bytes);
                }
            }
            Cow::Owned(out)
        }
    }
}
