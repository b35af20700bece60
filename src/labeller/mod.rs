//! Label placement.
//!
//! A [`RenderSession`] collects the footprints of drawn symbols and the
//! labels that want to sit next to them, then resolves every label in
//! priority order. Each label gets the first of its candidate positions
//! that stays on the plot and clear of everything already claimed, or is
//! dropped.
//!
//! Boxes are axis-aligned on the tangent plane. A rotated label claims the
//! bounding box of its rotated outline.

mod candidates;

pub use candidates::{
    CompassPoints, compass_candidates, dso_label_offset, ellipse_rim_candidates,
    star_label_offset,
};

use std::cmp::Ordering;

use crate::chart::Chart;
use crate::log::{debug, trace, warn};
use crate::render::{FontSpec, Surface, TextCommand, TextMeasure};
use crate::types::{BBox, CanvasPoint, CanvasRect, Colour, Offset, Px, Rad, TangentPoint, TangentRect, cp};

// ============================================================================
// Priority
// ============================================================================

/// Label priority. Lower values are placed first.
///
/// Only [`Priority::MUST_SHOW`] skips the bounds and collision tests. Any
/// finite priority, negative ones included, has to find room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Priority(f64);

impl Priority {
    /// Placed before every finite priority, whatever is in the way
    pub const MUST_SHOW: Priority = Priority(f64::NEG_INFINITY);

    /// # Panics
    /// If `value` is NaN.
    pub fn new(value: f64) -> Self {
        assert!(!value.is_nan(), "label priority must not be NaN");
        Priority(value)
    }

    /// Priority for a label on an object of the given magnitude; brighter
    /// objects win.
    pub fn from_magnitude(mag: f64) -> Self {
        Self::new(mag - 1e-6)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether labels at this priority are drawn regardless of bounds and
    /// collisions
    pub fn bypasses_collisions(self) -> bool {
        self.0 == f64::NEG_INFINITY
    }
}

impl From<f64> for Priority {
    fn from(value: f64) -> Self {
        Priority::new(value)
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        // never NaN
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

// ============================================================================
// Candidates and requests
// ============================================================================

/// Which edge of the text sits on the anchor horizontally
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Anchor at the left edge; text extends right
    #[default]
    Left,
    Centre,
    /// Anchor at the right edge; text extends left
    Right,
}

impl HAlign {
    fn fraction(self) -> f64 {
        match self {
            HAlign::Left => 0.0,
            HAlign::Centre => 0.5,
            HAlign::Right => 1.0,
        }
    }
}

/// Which edge of the text sits on the anchor vertically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Anchor at the top edge; text hangs below
    Top,
    #[default]
    Middle,
    /// Anchor at the bottom edge; text stands above
    Bottom,
}

impl VAlign {
    fn fraction(self) -> f64 {
        match self {
            VAlign::Top => 0.0,
            VAlign::Middle => 0.5,
            VAlign::Bottom => 1.0,
        }
    }
}

/// One place a label may go
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub anchor: TangentPoint,
    /// Shift from the anchor on the canvas, applied before rotation
    pub offset: Offset<Px>,
    /// Clockwise rotation about the anchor, radians
    pub rotation: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl Candidate {
    pub fn new(anchor: TangentPoint, h_align: HAlign, v_align: VAlign) -> Self {
        Candidate {
            anchor,
            offset: Offset::new(Px::ZERO, Px::ZERO),
            rotation: 0.0,
            h_align,
            v_align,
        }
    }

    pub fn with_offset(mut self, dx: Px, dy: Px) -> Self {
        self.offset = Offset::new(dx, dy);
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    fn is_finite(&self) -> bool {
        self.anchor.is_finite()
            && self.offset.dx.is_finite()
            && self.offset.dy.is_finite()
            && self.rotation.is_finite()
    }
}

/// How a label looks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
    /// Relative size; 1.0 is the chart's normal label size
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub colour: Colour,
    pub halo: Option<Colour>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        LabelStyle {
            font_size: 1.0,
            bold: false,
            italic: false,
            colour: Colour::BLACK,
            halo: None,
        }
    }
}

/// One line of a label
#[derive(Clone, Debug, PartialEq)]
pub struct LabelLine {
    pub text: String,
    pub style: LabelStyle,
}

impl LabelLine {
    pub fn new(text: impl Into<String>, style: LabelStyle) -> Self {
        LabelLine { text: text.into(), style }
    }
}

/// A label waiting to be placed: one or more stacked lines sharing one
/// list of candidates
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRequest {
    lines: Vec<LabelLine>,
    candidates: Vec<Candidate>,
    priority: Priority,
    extra_margin: f64,
    tight: bool,
    reserve_space: bool,
}

impl LabelRequest {
    pub fn new(
        text: impl Into<String>,
        candidates: Vec<Candidate>,
        priority: Priority,
        style: LabelStyle,
    ) -> Self {
        Self::group(vec![LabelLine::new(text, style)], candidates, priority)
    }

    /// Several lines placed as one block
    pub fn group(lines: Vec<LabelLine>, candidates: Vec<Candidate>, priority: Priority) -> Self {
        LabelRequest {
            lines,
            candidates,
            priority,
            extra_margin: 0.0,
            tight: false,
            reserve_space: true,
        }
    }

    /// Grow the clearance around the label by this factor
    pub fn extra_margin(mut self, factor: f64) -> Self {
        self.extra_margin = factor;
        self
    }

    /// Use a small clearance, for objects that carry several labels
    pub fn tight(mut self) -> Self {
        self.tight = true;
        self
    }

    /// Draw the label without claiming its area from later labels
    pub fn without_reserving_space(mut self) -> Self {
        self.reserve_space = false;
        self
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Symbols
// ============================================================================

/// Something drawn directly on the chart whose footprint labels avoid
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Circle {
        center: TangentPoint,
        radius: Px,
        colour: Colour,
    },
    /// Broken wherever a point is non-finite
    Polyline {
        points: Vec<TangentPoint>,
        width: Px,
        colour: Colour,
    },
}

// ============================================================================
// Session
// ============================================================================

/// A label that was placed
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLabel {
    /// Lines joined with `\n`
    pub text: String,
    /// Index of the candidate that was used
    pub candidate: usize,
    /// Claimed area, margins included
    pub bbox: TangentRect,
    pub priority: Priority,
}

/// Outcome of resolving a session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementReport {
    /// In placement order
    pub placed: Vec<PlacedLabel>,
    /// Text of labels that found no room
    pub dropped: Vec<String>,
}

/// A label laid out at one candidate
struct Layout {
    bbox: TangentRect,
    commands: Vec<TextCommand>,
}

/// Label state for one chart render
pub struct RenderSession<'c, M> {
    chart: &'c Chart,
    metrics: M,
    exclusions: Vec<TangentRect>,
    requests: Vec<LabelRequest>,
}

impl<'c, M: TextMeasure> RenderSession<'c, M> {
    pub fn new(chart: &'c Chart, metrics: M) -> Self {
        RenderSession {
            chart,
            metrics,
            exclusions: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn chart(&self) -> &'c Chart {
        self.chart
    }

    /// Areas no label may cover
    pub fn exclusions(&self) -> &[TangentRect] {
        &self.exclusions
    }

    /// Number of labels waiting to be resolved
    pub fn pending(&self) -> usize {
        self.requests.len()
    }

    /// Claim an area of the tangent plane. Non-finite areas are ignored.
    pub fn register_exclusion(&mut self, rect: TangentRect) {
        if !(rect.min.is_finite() && rect.max.is_finite()) {
            warn!("ignoring non-finite exclusion {:?}", rect);
            return;
        }
        if rect.is_empty() {
            trace!("ignoring empty exclusion {:?}", rect);
            return;
        }
        self.exclusions.push(rect);
    }

    /// Claim an area given in canvas units
    pub fn register_canvas_exclusion(&mut self, rect: CanvasRect) {
        let rect = self.chart.canvas().rect_to_tangent(&rect);
        self.register_exclusion(rect);
    }

    /// Draw a symbol and claim its footprint
    pub fn draw_symbol<S: Surface + ?Sized>(&mut self, surface: &mut S, symbol: &Symbol) {
        let chart = self.chart;
        let canvas = chart.canvas();
        match symbol {
            Symbol::Circle { center, radius, colour } => {
                if !center.is_finite() {
                    return;
                }
                let c = canvas.to_canvas(*center);
                surface.fill_circle(c, *radius, *colour);
                self.register_canvas_exclusion(BBox::from_corners(
                    cp(c.x.0 - radius.0, c.y.0 - radius.0),
                    cp(c.x.0 + radius.0, c.y.0 + radius.0),
                ));
            }
            Symbol::Polyline { points, width, colour } => {
                let pad = Rad(width.0 / 2.0 / canvas.scale());
                for run in points.split(|p| !p.is_finite()) {
                    if run.len() < 2 {
                        continue;
                    }
                    let on_canvas: Vec<CanvasPoint> = run.iter().map(|p| canvas.to_canvas(*p)).collect();
                    surface.stroke_polyline(&on_canvas, *width, *colour);
                    for seg in run.windows(2) {
                        self.register_exclusion(BBox::from_corners(seg[0], seg[1]).pad(pad, pad));
                    }
                }
            }
        }
    }

    /// Queue a single-line label
    ///
    /// # Panics
    /// If `candidates` is empty.
    pub fn submit_label(
        &mut self,
        text: impl Into<String>,
        candidates: Vec<Candidate>,
        priority: Priority,
        style: LabelStyle,
    ) {
        self.submit(LabelRequest::new(text, candidates, priority, style));
    }

    /// Queue several lines to be placed together around one anchor
    ///
    /// # Panics
    /// If `lines` or `candidates` is empty.
    pub fn submit_label_group(&mut self, lines: Vec<LabelLine>, candidates: Vec<Candidate>, priority: Priority) {
        self.submit(LabelRequest::group(lines, candidates, priority));
    }

    /// # Panics
    /// If the request has no lines or no candidates.
    pub fn submit(&mut self, request: LabelRequest) {
        assert!(!request.candidates.is_empty(), "label request needs at least one candidate");
        assert!(!request.lines.is_empty(), "label request needs at least one line");
        self.requests.push(request);
    }

    /// Place every queued label, draw the placed ones, and end the session.
    pub fn resolve_and_flush<S: Surface + ?Sized>(mut self, surface: &mut S) -> PlacementReport {
        let mut requests = std::mem::take(&mut self.requests);
        // stable: equal priorities keep submission order
        requests.sort_by(|a, b| a.priority.cmp(&b.priority));

        let mut report = PlacementReport::default();
        let mut queued = Vec::new();
        for request in &requests {
            match self.place(request) {
                Some((index, layout)) => {
                    if request.reserve_space {
                        self.exclusions.push(layout.bbox);
                    }
                    queued.extend(layout.commands);
                    report.placed.push(PlacedLabel {
                        text: request.text(),
                        candidate: index,
                        bbox: layout.bbox,
                        priority: request.priority,
                    });
                }
                None => {
                    debug!("no room for label {:?}", request.text());
                    report.dropped.push(request.text());
                }
            }
        }

        for cmd in &queued {
            surface.draw_text(cmd);
        }
        debug!(
            "placed {} label(s), dropped {}",
            report.placed.len(),
            report.dropped.len()
        );
        report
    }

    /// First acceptable candidate for `request`
    fn place(&self, request: &LabelRequest) -> Option<(usize, Layout)> {
        let canvas = self.chart.canvas();
        request
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_finite())
            .filter_map(|(i, c)| Some((i, self.layout(request, c)?)))
            .find(|(_, layout)| {
                request.priority.bypasses_collisions()
                    || (canvas.contains_rect(&layout.bbox)
                        && !self.exclusions.iter().any(|e| e.intersects(&layout.bbox)))
            })
    }

    fn layout(&self, request: &LabelRequest, candidate: &Candidate) -> Option<Layout> {
        let canvas = self.chart.canvas();
        let em = 2.0 * canvas.mm() * self.chart.font_scale();

        let measured: Vec<_> = request
            .lines
            .iter()
            .map(|line| {
                let font = FontSpec {
                    size: Px(em * line.style.font_size),
                    bold: line.style.bold,
                    italic: line.style.italic,
                };
                (line, font, self.metrics.measure(&line.text, &font))
            })
            .collect();
        let w = measured.iter().map(|(_, _, e)| e.width.0).fold(0.0, f64::max);
        let h: f64 = measured.iter().map(|(_, _, e)| e.height().0).sum();

        let anchor = canvas.to_canvas(candidate.anchor);
        if !anchor.is_finite() {
            return None;
        }
        let hf = candidate.h_align.fraction();
        // top-left of the text block before rotation
        let x0 = anchor.x.0 + candidate.offset.dx.0 - hf * w;
        let y0 = anchor.y.0 + candidate.offset.dy.0 - candidate.v_align.fraction() * h;
        let rotate = |p: CanvasPoint| p.rotate_about(anchor, candidate.rotation);

        let mut outline = CanvasRect::new();
        for corner in [cp(x0, y0), cp(x0 + w, y0), cp(x0, y0 + h), cp(x0 + w, y0 + h)] {
            outline.expand_point(rotate(corner));
        }
        let margin = (if request.tight { 0.01 } else { 0.07 }) * (request.extra_margin + 1.0);
        let outline = outline.pad(outline.width() * margin, outline.height() * margin * 2.3);
        let bbox = canvas.rect_to_tangent(&outline);

        let mut y = y0;
        let commands = measured
            .into_iter()
            .map(|(line, font, extents)| {
                let origin = cp(x0 + hf * (w - extents.width.0), y + extents.ascent.0);
                y += extents.height().0;
                TextCommand {
                    text: line.text.clone(),
                    origin: rotate(origin),
                    rotation: candidate.rotation,
                    font,
                    colour: line.style.colour,
                    halo: line.style.halo,
                }
            })
            .collect();

        Some(Layout { bbox, commands })
    }
}
