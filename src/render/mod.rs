//! The graphics backend seam.
//!
//! The core never rasterizes or encodes anything itself: it hands canvas
//! coordinates to a [`Surface`] and asks a [`TextMeasure`] how big text is.

mod metrics;
mod recorder;

pub use metrics::{AW_CHAR, ProportionalMetrics, text_length};
pub use recorder::{DrawOp, Recorder};

use crate::types::{CanvasPoint, Colour, Px};

/// Font selection for one run of text
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Em size in canvas units
    pub size: Px,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(size: Px) -> Self {
        FontSpec { size, bold: false, italic: false }
    }
}

/// Measured size of a run of text, in canvas units
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TextExtents {
    /// Advance width
    pub width: Px,
    /// Height above the baseline
    pub ascent: Px,
    /// Depth below the baseline
    pub descent: Px,
}

impl TextExtents {
    pub fn height(&self) -> Px {
        self.ascent + self.descent
    }
}

/// A single line of text to draw
#[derive(Clone, Debug, PartialEq)]
pub struct TextCommand {
    pub text: String,
    /// Start of the baseline
    pub origin: CanvasPoint,
    /// Clockwise rotation about `origin`, radians
    pub rotation: f64,
    pub font: FontSpec,
    pub colour: Colour,
    /// Background halo drawn behind the glyphs
    pub halo: Option<Colour>,
}

/// Anything that can draw a chart
pub trait Surface {
    fn draw_text(&mut self, cmd: &TextCommand);

    fn fill_circle(&mut self, center: CanvasPoint, radius: Px, colour: Colour);

    fn stroke_polyline(&mut self, points: &[CanvasPoint], width: Px, colour: Colour);
}

/// Measures text the way the backend will draw it
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtents;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> TextExtents {
        (**self).measure(text, font)
    }
}
