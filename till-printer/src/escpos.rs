//! ESC/POS encoder
//!
//! Maps print directives to the ESC/POS byte stream sent to the printer.

use crate::directive::{Alignment, Emphasis, PrintDirective, TextSize};
use crate::encoding::{CodePage, encode_text};
use tracing::instrument;

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// ESC @ - initialize printer
const INIT: [u8; 2] = [ESC, b'@'];

/// ESC/POS encoder
///
/// Every output starts with `ESC @`, so a job never inherits alignment, size
/// or emphasis left over from the previous one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    code_page: CodePage,
}

impl Encoder {
    /// Create an encoder for the given code page
    pub fn new(code_page: CodePage) -> Self {
        Self { code_page }
    }

    /// Encode directives into printer bytes
    #[instrument(skip(self, directives), fields(directives = directives.len(), code_page = %self.code_page))]
    pub fn encode(&self, directives: &[PrintDirective]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4096);
        buf.extend_from_slice(&INIT);
        if let Some(select) = self.code_page.select_command() {
            buf.extend_from_slice(&select);
        }

        for directive in directives {
            self.push(&mut buf, directive);
        }

        buf
    }

    fn push(&self, buf: &mut Vec<u8>, directive: &PrintDirective) {
        match directive {
            PrintDirective::Text(s) => buf.extend_from_slice(&encode_text(s, self.code_page)),
            // ESC a n
            PrintDirective::SetAlignment(Alignment::Left) => buf.extend_from_slice(&[ESC, b'a', 0x00]),
            PrintDirective::SetAlignment(Alignment::Center) => {
                buf.extend_from_slice(&[ESC, b'a', 0x01])
            }
            // ESC E n
            PrintDirective::SetEmphasis(Emphasis::On) => buf.extend_from_slice(&[ESC, b'E', 0x01]),
            PrintDirective::SetEmphasis(Emphasis::Off) => buf.extend_from_slice(&[ESC, b'E', 0x00]),
            // GS ! n
            PrintDirective::SetSize(TextSize::Normal) => buf.extend_from_slice(&[GS, b'!', 0x00]),
            PrintDirective::SetSize(TextSize::DoubleWidthHeight) => {
                buf.extend_from_slice(&[GS, b'!', 0x11])
            }
            PrintDirective::FeedLines(n) => buf.extend(std::iter::repeat_n(LF, *n as usize)),
            // GS V 0 - full cut
            PrintDirective::CutPaper => buf.extend_from_slice(&[GS, b'V', 0x00]),
        }
    }
}

/// Encode directives as UTF-8 text with the default encoder
pub fn encode(directives: &[PrintDirective]) -> Vec<u8> {
    Encoder::default().encode(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_init_only() {
        assert_eq!(encode(&[]), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_golden_bytes() {
        let data = encode(&[
            PrintDirective::SetAlignment(Alignment::Center),
            PrintDirective::SetSize(TextSize::DoubleWidthHeight),
            PrintDirective::line("Hi"),
            PrintDirective::SetSize(TextSize::Normal),
            PrintDirective::SetAlignment(Alignment::Left),
            PrintDirective::SetEmphasis(Emphasis::On),
            PrintDirective::line("X"),
            PrintDirective::SetEmphasis(Emphasis::Off),
            PrintDirective::FeedLines(2),
            PrintDirective::CutPaper,
            PrintDirective::FeedLines(0),
        ]);

        let expected: Vec<u8> = vec![
            0x1B, 0x40, // init
            0x1B, 0x61, 0x01, // center
            0x1D, 0x21, 0x11, // double
            b'H', b'i', 0x0A, //
            0x1D, 0x21, 0x00, // normal
            0x1B, 0x61, 0x00, // left
            0x1B, 0x45, 0x01, // bold
            b'X', 0x0A, //
            0x1B, 0x45, 0x00, // bold off
            0x0A, 0x0A, // feed 2
            0x1D, 0x56, 0x00, // cut
        ];
        assert_eq!(data, expected);
    }

    #[test]
    fn test_deterministic() {
        let directives = vec![
            PrintDirective::line("Döner"),
            PrintDirective::FeedLines(3),
            PrintDirective::CutPaper,
        ];
        assert_eq!(encode(&directives), encode(&directives));
    }

    #[test]
    fn test_cp1252_selects_code_table_after_init() {
        let data = Encoder::new(CodePage::Cp1252).encode(&[PrintDirective::line("€")]);
        assert_eq!(data, vec![0x1B, 0x40, 0x1B, 0x74, 16, 0x80, 0x0A]);
    }
}
