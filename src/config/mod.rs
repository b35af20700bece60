//! Chart configuration: the settings block a chart is built from, its
//! defaults, validation, and the chart file reader.

mod parse;

pub use parse::parse_charts;

use crate::canvas::CanvasLayout;
use crate::coords::{CoordinateSystem, JulianDate, Observer};
use crate::errors::ConfigError;
use crate::projection::{ProjectionConfig, ProjectionKind};
use crate::sphtrig::LonLat;
use crate::types::{NumericError, try_positive};

/// Settings for one chart. Angles are in the units a chart file uses:
/// hours for right ascension, degrees for everything else.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub projection: ProjectionKind,
    pub coords: CoordinateSystem,
    /// Right ascension of the centre, hours (`coords = ra_dec`)
    pub ra_central: f64,
    /// Declination of the centre, degrees (`coords = ra_dec`)
    pub dec_central: f64,
    pub galactic_l_central: f64,
    pub galactic_b_central: f64,
    pub az_central: f64,
    pub alt_central: f64,
    /// Tilt of north counter-clockwise from up, degrees
    pub position_angle: f64,
    /// Angular width across the chart, degrees
    pub angular_width: f64,
    /// Width of the plot area, cm
    pub width: f64,
    /// Height over width
    pub aspect: f64,
    pub dpi: f64,
    pub title: Option<String>,
    /// Scale applied to all text
    pub font_size: f64,
    /// Extra scale applied to labels
    pub label_font_size_scaling: f64,
    pub multilatitude_strips: u32,
    /// Draw the horizon and clip objects below it
    pub show_horizon: bool,
    /// Observer latitude, degrees
    pub horizon_latitude: f64,
    /// Observer longitude, degrees east
    pub horizon_longitude: f64,
    pub julian_date: Option<f64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            projection: ProjectionKind::Flat,
            coords: CoordinateSystem::RaDec,
            ra_central: 0.0,
            dec_central: 0.0,
            galactic_l_central: 0.0,
            galactic_b_central: 0.0,
            az_central: 180.0,
            alt_central: 45.0,
            position_angle: 0.0,
            angular_width: 25.0,
            width: 16.5,
            aspect: std::f64::consts::SQRT_2,
            dpi: 72.0,
            title: None,
            font_size: 1.0,
            label_font_size_scaling: 1.0,
            multilatitude_strips: 6,
            show_horizon: false,
            horizon_latitude: 0.0,
            horizon_longitude: 0.0,
            julian_date: None,
        }
    }
}

impl ChartConfig {
    /// Chart centre in the chart's coordinate system, radians
    pub fn center(&self) -> LonLat {
        match self.coords {
            CoordinateSystem::RaDec => {
                LonLat::new((self.ra_central * 15.0).to_radians(), self.dec_central.to_radians())
            }
            CoordinateSystem::Galactic => {
                LonLat::from_degrees(self.galactic_l_central, self.galactic_b_central)
            }
            CoordinateSystem::AltAz => LonLat::from_degrees(self.az_central, self.alt_central),
        }
    }

    /// The observer, when a time of observation is set
    pub fn observer(&self) -> Option<Observer> {
        self.julian_date.map(|jd| {
            Observer::from_degrees(self.horizon_latitude, self.horizon_longitude, JulianDate(jd))
        })
    }

    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig {
            kind: self.projection,
            coords: self.coords,
            center: self.center(),
            position_angle: self.position_angle.to_radians(),
            angular_width: self.angular_width.to_radians(),
            strips: self.multilatitude_strips,
            observer: self.observer(),
            clip_below_horizon: self.show_horizon,
        }
    }

    pub fn canvas_layout(&self) -> CanvasLayout {
        CanvasLayout {
            width_cm: self.width,
            aspect: self.aspect,
            dpi: self.dpi,
            offset_x_cm: 1.6,
            offset_y_cm: if self.title.is_some() { 1.4 } else { 0.7 },
        }
    }

    /// Combined scale for label text
    pub fn label_scale(&self) -> f64 {
        self.font_size * self.label_font_size_scaling
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = |field: &'static str| move |source: NumericError| ConfigError::InvalidValue { field, source };
        try_positive(self.width).map_err(field("width"))?;
        try_positive(self.aspect).map_err(field("aspect"))?;
        try_positive(self.dpi).map_err(field("output_dpi"))?;
        try_positive(self.font_size).map_err(field("font_size"))?;
        try_positive(self.label_font_size_scaling).map_err(field("label_font_size_scaling"))?;
        if let Some(jd) = self.julian_date {
            if !jd.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field: "julian_date",
                    source: if jd.is_nan() { NumericError::NaN } else { NumericError::Infinite },
                });
            }
        }
        if self.coords == CoordinateSystem::AltAz && self.julian_date.is_none() {
            return Err(ConfigError::MissingObserver { what: "the alt/az coordinate system" });
        }
        self.projection_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ChartConfig::default().validate(), Ok(()));
    }

    #[test]
    fn centre_follows_coordinate_system() {
        let cfg = ChartConfig { ra_central: 6.0, dec_central: 30.0, ..ChartConfig::default() };
        let c = cfg.center();
        assert!((c.lon - 90f64.to_radians()).abs() < 1e-12);
        assert!((c.lat - 30f64.to_radians()).abs() < 1e-12);

        let cfg = ChartConfig {
            coords: CoordinateSystem::Galactic,
            galactic_l_central: 10.0,
            ..ChartConfig::default()
        };
        assert!((cfg.center().lon - 10f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn title_pushes_the_plot_down() {
        let cfg = ChartConfig { title: Some("Orion".into()), ..ChartConfig::default() };
        assert_eq!(cfg.canvas_layout().offset_y_cm, 1.4);
        assert_eq!(ChartConfig::default().canvas_layout().offset_y_cm, 0.7);
    }

    #[test]
    fn alt_az_needs_a_time() {
        let cfg = ChartConfig { coords: CoordinateSystem::AltAz, ..ChartConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingObserver { .. })));
        let cfg = ChartConfig { julian_date: Some(2460000.5), ..cfg };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn horizon_needs_a_time() {
        let cfg = ChartConfig { show_horizon: true, ..ChartConfig::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingObserver { what: "horizon clipping" })
        );
    }

    #[test]
    fn negative_width_is_rejected() {
        let cfg = ChartConfig { width: -3.0, ..ChartConfig::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { field: "width", source: NumericError::Negative })
        );
    }
}
