//! A configured chart: projection plus canvas, fixed for one render.

use crate::canvas::{CanvasLayout, CanvasTransform, PagePoint};
use crate::config::ChartConfig;
use crate::coords::SkyPoint;
use crate::errors::ConfigError;
use crate::log::debug;
use crate::projection::{ProjectionConfig, SkyProjection};
use crate::types::{CanvasPoint, NumericError, TangentPoint, try_positive};

/// Where something goes on a chart: a sky position, or a fixed spot on
/// the page (titles, keys, scale bars).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    Sky(SkyPoint),
    Page(PagePoint),
}

impl From<SkyPoint> for Position {
    fn from(p: SkyPoint) -> Self {
        Position::Sky(p)
    }
}

impl From<PagePoint> for Position {
    fn from(p: PagePoint) -> Self {
        Position::Page(p)
    }
}

/// Everything needed to place things on one chart
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chart {
    projection: SkyProjection,
    canvas: CanvasTransform,
    font_scale: f64,
}

impl Chart {
    /// Validate `config` and fix the projection and canvas for a render.
    pub fn new(config: &ChartConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::from_parts(&config.projection_config(), config.canvas_layout(), config.label_scale())
    }

    pub fn from_parts(
        projection: &ProjectionConfig,
        layout: CanvasLayout,
        font_scale: f64,
    ) -> Result<Self, ConfigError> {
        try_positive(font_scale)
            .map_err(|source: NumericError| ConfigError::InvalidValue { field: "font scale", source })?;
        let projection = SkyProjection::new(projection)?;
        let canvas = CanvasTransform::new(projection.linear_width(), layout)?;
        debug!(
            "chart {}x{} at {} dpi",
            canvas.canvas_size().w,
            canvas.canvas_size().h,
            layout.dpi
        );
        Ok(Chart { projection, canvas, font_scale })
    }

    pub fn projection(&self) -> &SkyProjection {
        &self.projection
    }

    pub fn canvas(&self) -> &CanvasTransform {
        &self.canvas
    }

    /// Scale applied to every label's font size
    pub fn font_scale(&self) -> f64 {
        self.font_scale
    }

    /// Tangent-plane position of a point, non-finite when it is off the
    /// projection or clipped by the horizon
    pub fn project(&self, point: SkyPoint, allow_below_horizon: bool) -> TangentPoint {
        self.projection.project(point, allow_below_horizon)
    }

    pub fn inverse_project(&self, t: TangentPoint) -> SkyPoint {
        self.projection.inverse_project(t)
    }

    /// Tangent-plane position of either kind of position. Sky positions
    /// are clipped by the horizon when clipping is on.
    pub fn locate(&self, position: Position) -> TangentPoint {
        match position {
            Position::Sky(p) => self.project(p, false),
            Position::Page(p) => self.canvas.page_to_tangent(p),
        }
    }

    pub fn to_canvas(&self, t: TangentPoint) -> CanvasPoint {
        self.canvas.to_canvas(t)
    }

    /// Whether a tangent-plane point falls inside the plot area
    pub fn in_bounds(&self, t: TangentPoint) -> bool {
        self.canvas.contains(t)
    }
}
