//! A surface that records draw calls instead of drawing.

use std::fmt::{self, Write as _};

use super::{Surface, TextCommand};
use crate::types::{CanvasPoint, Colour, Px};

/// One recorded draw call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text(TextCommand),
    Circle { center: CanvasPoint, radius: Px, colour: Colour },
    Polyline { points: Vec<CanvasPoint>, width: Px, colour: Colour },
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::Text(cmd) => {
                write!(f, "text {:?} at ({:.1}, {:.1})", cmd.text, cmd.origin.x.0, cmd.origin.y.0)?;
                if cmd.rotation != 0.0 {
                    write!(f, " rot {:.3}", cmd.rotation)?;
                }
                write!(f, " size {:.2}", cmd.font.size.0)?;
                if cmd.halo.is_some() {
                    write!(f, " halo")?;
                }
                Ok(())
            }
            DrawOp::Circle { center, radius, .. } => {
                write!(f, "circle ({:.1}, {:.1}) r {:.2}", center.x.0, center.y.0, radius.0)
            }
            DrawOp::Polyline { points, width, .. } => {
                write!(f, "polyline {} points w {:.2}", points.len(), width.0)
            }
        }
    }
}

/// Display list of everything drawn on it, in order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every recorded text command, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(cmd) => Some(cmd.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// One line per recorded op
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            let _ = writeln!(out, "{op}");
        }
        out
    }
}

impl Surface for Recorder {
    fn draw_text(&mut self, cmd: &TextCommand) {
        self.ops.push(DrawOp::Text(cmd.clone()));
    }

    fn fill_circle(&mut self, center: CanvasPoint, radius: Px, colour: Colour) {
        self.ops.push(DrawOp::Circle { center, radius, colour });
    }

    fn stroke_polyline(&mut self, points: &[CanvasPoint], width: Px, colour: Colour) {
        self.ops.push(DrawOp::Polyline { points: points.to_vec(), width, colour });
    }
}
