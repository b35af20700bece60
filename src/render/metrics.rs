//! Approximate text metrics without a font engine.

use super::{FontSpec, TextExtents, TextMeasure};
use crate::types::Px;

/// Advance widths of printable ASCII (0x20..=0x7e) in hundredths of an
/// average character
pub const AW_CHAR: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Proportional length of `text` in hundredths of an average character.
/// Anything outside printable ASCII counts as one average character.
pub fn text_length(text: &str) -> u32 {
    text.chars()
        .map(|c| match c {
            ' '..='~' => AW_CHAR[(c as usize) - 0x20] as u32,
            _ => 100,
        })
        .sum()
}

/// Text measurer using the proportional width table.
///
/// Good enough for placement decisions when the real backend cannot be
/// asked, and fully deterministic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProportionalMetrics {
    /// Width of an average character, in ems
    pub char_width: f64,
    /// Ascent, in ems
    pub ascent: f64,
    /// Descent, in ems
    pub descent: f64,
    /// Extra width for bold text
    pub bold_factor: f64,
}

impl Default for ProportionalMetrics {
    fn default() -> Self {
        ProportionalMetrics {
            char_width: 0.55,
            ascent: 0.75,
            descent: 0.25,
            bold_factor: 1.1,
        }
    }
}

impl TextMeasure for ProportionalMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtents {
        let em = font.size.0;
        let mut width = text_length(text) as f64 * 0.01 * self.char_width * em;
        if font.bold {
            width *= self.bold_factor;
        }
        TextExtents {
            width: Px(width),
            ascent: Px(self.ascent * em),
            descent: Px(self.descent * em),
        }
    }
}
