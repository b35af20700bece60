//! Affine mapping between the tangent plane and the output canvas.
//!
//! Only scale and offset: the projection has already done the curved part.

use crate::errors::ConfigError;
use crate::types::{
    BBox, CanvasPoint, CanvasRect, NumericError, Px, Size, TangentPoint, TangentRect, cp, tp,
    try_finite, try_positive,
};

/// Centimetres per inch
const CM_PER_INCH: f64 = 2.54;

/// Physical layout of the plot area on the page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasLayout {
    /// Width of the plot area, cm
    pub width_cm: f64,
    /// Height of the plot area over its width
    pub aspect: f64,
    /// Output units per inch (72 for vector output)
    pub dpi: f64,
    /// Left margin, cm
    pub offset_x_cm: f64,
    /// Top margin, cm
    pub offset_y_cm: f64,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        CanvasLayout {
            width_cm: 16.5,
            aspect: std::f64::consts::SQRT_2,
            dpi: 72.0,
            offset_x_cm: 1.6,
            offset_y_cm: 0.7,
        }
    }
}

/// A position across the plot area, both axes running 0..1 from the
/// top-left corner. Used for annotations placed on the page rather than
/// on the sky.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PagePoint {
    pub u: f64,
    pub v: f64,
}

impl PagePoint {
    pub fn new(u: f64, v: f64) -> Self {
        PagePoint { u, v }
    }
}

/// Fixed tangent-plane to canvas transform for one render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
    extent: TangentRect,
    layout: CanvasLayout,
    /// Output units per cm
    cm: f64,
}

impl CanvasTransform {
    /// Transform for a plot whose width spans `linear_width` on the tangent
    /// plane; the height spans `linear_width * aspect`.
    pub fn new(linear_width: f64, layout: CanvasLayout) -> Result<Self, ConfigError> {
        let field = |field: &'static str| move |source: NumericError| ConfigError::InvalidValue { field, source };
        try_positive(linear_width).map_err(field("linear width"))?;
        try_positive(layout.width_cm).map_err(field("width"))?;
        try_positive(layout.aspect).map_err(field("aspect"))?;
        try_positive(layout.dpi).map_err(field("dpi"))?;
        try_finite(layout.offset_x_cm).map_err(field("canvas offset x"))?;
        try_finite(layout.offset_y_cm).map_err(field("canvas offset y"))?;

        let half_w = linear_width / 2.0;
        let half_h = half_w * layout.aspect;
        Ok(CanvasTransform {
            extent: BBox::from_corners(tp(-half_w, -half_h), tp(half_w, half_h)),
            layout,
            cm: layout.dpi / CM_PER_INCH,
        })
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Output units per centimetre
    pub fn cm(&self) -> f64 {
        self.cm
    }

    /// Output units per millimetre
    pub fn mm(&self) -> f64 {
        self.cm * 0.1
    }

    /// Output units per typographic point
    pub fn pt(&self) -> f64 {
        self.layout.dpi / 72.0
    }

    /// The plot area on the tangent plane
    pub fn extent(&self) -> &TangentRect {
        &self.extent
    }

    fn plot_width(&self) -> f64 {
        self.layout.width_cm * self.cm
    }

    fn plot_height(&self) -> f64 {
        self.layout.width_cm * self.layout.aspect * self.cm
    }

    /// Output units per radian on the tangent plane
    pub fn scale(&self) -> f64 {
        self.plot_width() / self.extent.width().0
    }

    pub fn to_canvas(&self, t: TangentPoint) -> CanvasPoint {
        let u = (t.x - self.extent.min.x).0 / self.extent.width().0;
        let v = (t.y - self.extent.min.y).0 / self.extent.height().0;
        cp(
            u * self.plot_width() + self.layout.offset_x_cm * self.cm,
            v * self.plot_height() + self.layout.offset_y_cm * self.cm,
        )
    }

    pub fn to_tangent(&self, c: CanvasPoint) -> TangentPoint {
        let u = (c.x.0 - self.layout.offset_x_cm * self.cm) / self.plot_width();
        let v = (c.y.0 - self.layout.offset_y_cm * self.cm) / self.plot_height();
        self.page_to_tangent(PagePoint::new(u, v))
    }

    pub fn page_to_tangent(&self, p: PagePoint) -> TangentPoint {
        let x = self.extent.min.x.0 + p.u * self.extent.width().0;
        let y = self.extent.min.y.0 + p.v * self.extent.height().0;
        tp(x, y)
    }

    pub fn rect_to_tangent(&self, r: &CanvasRect) -> TangentRect {
        BBox::from_corners(self.to_tangent(r.min), self.to_tangent(r.max))
    }

    pub fn rect_to_canvas(&self, r: &TangentRect) -> CanvasRect {
        BBox::from_corners(self.to_canvas(r.min), self.to_canvas(r.max))
    }

    /// Whether a tangent-plane point lies within the plot area
    pub fn contains(&self, t: TangentPoint) -> bool {
        t.is_finite() && self.extent.contains_point(t)
    }

    /// Whether a tangent-plane box lies entirely within the plot area
    pub fn contains_rect(&self, r: &TangentRect) -> bool {
        self.extent.contains_bbox(r)
    }

    /// The plot area on the canvas
    pub fn plot_rect(&self) -> CanvasRect {
        self.rect_to_canvas(&self.extent)
    }

    /// Whole page size: plot area plus margins (the bottom margin is fixed
    /// at 0.7 cm)
    pub fn canvas_size(&self) -> Size<Px> {
        Size {
            w: Px(self.plot_width() + 2.0 * self.layout.offset_x_cm * self.cm),
            h: Px(self.plot_height() + (self.layout.offset_y_cm + 0.7) * self.cm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> CanvasTransform {
        CanvasTransform::new(0.5, CanvasLayout::default()).unwrap()
    }

    #[test]
    fn offsets_must_be_finite() {
        let layout = CanvasLayout { offset_x_cm: f64::NAN, ..CanvasLayout::default() };
        assert!(matches!(
            CanvasTransform::new(0.5, layout),
            Err(ConfigError::InvalidValue { field: "canvas offset x", source: NumericError::NaN })
        ));
        let layout = CanvasLayout { offset_y_cm: -0.5, ..CanvasLayout::default() };
        assert!(CanvasTransform::new(0.5, layout).is_ok());
    }

    #[test]
    fn centre_maps_to_middle_of_plot() {
        let t = transform();
        let c = t.to_canvas(tp(0.0, 0.0));
        let plot = t.plot_rect();
        assert!((c.x.0 - plot.center().x.0).abs() < 1e-9);
        assert!((c.y.0 - plot.center().y.0).abs() < 1e-9);
    }

    #[test]
    fn top_left_corner_is_offset_by_margins() {
        let t = transform();
        let c = t.to_canvas(t.extent().min);
        assert!((c.x.0 - 1.6 * t.cm()).abs() < 1e-9);
        assert!((c.y.0 - 0.7 * t.cm()).abs() < 1e-9);
    }

    #[test]
    fn round_trip() {
        let t = transform();
        let p = tp(0.123, -0.2);
        let back = t.to_tangent(t.to_canvas(p));
        assert!((back.x.0 - p.x.0).abs() < 1e-12);
        assert!((back.y.0 - p.y.0).abs() < 1e-12);
    }

    #[test]
    fn page_coordinates_span_the_plot() {
        let t = transform();
        assert_eq!(t.page_to_tangent(PagePoint::new(0.0, 0.0)), t.extent().min);
        let far = t.page_to_tangent(PagePoint::new(1.0, 1.0));
        assert!((far.x.0 - 0.25).abs() < 1e-12);
        assert!((far.y.0 - 0.25 * std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn scale_is_uniform() {
        let t = transform();
        let a = t.to_canvas(tp(0.0, 0.0));
        let b = t.to_canvas(tp(0.01, 0.01));
        assert!(((b.x.0 - a.x.0) - (b.y.0 - a.y.0)).abs() < 1e-9);
        assert!(((b.x.0 - a.x.0) - 0.01 * t.scale()).abs() < 1e-9);
    }

    #[test]
    fn units() {
        let t = transform();
        assert!((t.cm() - 72.0 / 2.54).abs() < 1e-12);
        assert!((t.mm() * 10.0 - t.cm()).abs() < 1e-12);
        assert_eq!(t.pt(), 1.0);
    }

    #[test]
    fn rejects_degenerate_layouts() {
        let layout = CanvasLayout { aspect: 0.0, ..CanvasLayout::default() };
        assert_eq!(
            CanvasTransform::new(0.5, layout),
            Err(ConfigError::InvalidValue { field: "aspect", source: NumericError::Zero })
        );
        assert!(CanvasTransform::new(f64::NAN, CanvasLayout::default()).is_err());
    }

    #[test]
    fn containment_excludes_non_finite_points() {
        let t = transform();
        assert!(t.contains(tp(0.0, 0.0)));
        assert!(!t.contains(tp(0.3, 0.0)));
        assert!(!t.contains(tp(f64::NAN, 0.0)));
    }
}
