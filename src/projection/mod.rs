//! Sky-to-plane projections.
//!
//! A chart picks one policy when it is built and keeps it for the whole
//! render. Points outside a policy's domain come back with non-finite
//! coordinates; that is the only out-of-domain signal.
//!
//! Tangent-plane axes: x grows to the right, y grows downwards, and on an
//! unrotated chart north is up and east (increasing longitude) is left.

mod cylindrical;
mod flat;
mod multi_latitude;
mod spherical;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use enum_dispatch::enum_dispatch;

pub use cylindrical::Cylindrical;
pub use flat::Flat;
pub use multi_latitude::MultiLatitude;
pub use spherical::Spherical;

use crate::coords::{CoordinateConverter, CoordinateSystem, Observer, SkyPoint};
use crate::errors::ConfigError;
use crate::log::debug;
use crate::sphtrig::{LonLat, ang_dist};
use crate::types::{NumericError, Rad, TangentPoint, tp, try_positive};

/// Projection policies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProjectionKind {
    /// Gnomonic: great circles are straight lines
    #[default]
    Flat,
    /// Cylindrical equal-area ("Peters")
    Cylindrical,
    /// Latitude strips with piecewise-linear horizontal scale
    MultiLatitude,
    /// Stereographic
    Spherical,
}

impl ProjectionKind {
    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::Flat => "gnomonic",
            ProjectionKind::Cylindrical => "peters",
            ProjectionKind::MultiLatitude => "multilatitude",
            ProjectionKind::Spherical => "stereographic",
        }
    }

    /// Widest angular width (radians, exclusive) the policy can show
    pub fn max_angular_width(self) -> f64 {
        match self {
            ProjectionKind::Flat => PI,
            // The whole sky fits
            ProjectionKind::Cylindrical | ProjectionKind::MultiLatitude => TAU + 1e-9,
            ProjectionKind::Spherical => TAU,
        }
    }
}

/// One projection policy, already centred and rotated for a chart
#[enum_dispatch]
pub trait PlaneProjector {
    /// Chart longitude/latitude to the tangent plane
    fn forward(&self, p: LonLat) -> TangentPoint;

    /// Tangent plane back to chart longitude/latitude
    fn inverse(&self, t: TangentPoint) -> LonLat;

    /// Extent on the tangent plane spanned by `angular_width` radians
    /// across the centre
    fn linear_width(&self, angular_width: f64) -> f64;
}

#[enum_dispatch(PlaneProjector)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Flat,
    Cylindrical,
    MultiLatitude,
    Spherical,
}

impl Projection {
    pub fn new(kind: ProjectionKind, center: LonLat, position_angle: f64, strips: u32) -> Self {
        match kind {
            ProjectionKind::Flat => Flat::new(center, position_angle).into(),
            ProjectionKind::Cylindrical => Cylindrical::new(center, position_angle).into(),
            ProjectionKind::MultiLatitude => {
                MultiLatitude::new(center, position_angle, strips).into()
            }
            ProjectionKind::Spherical => Spherical::new(center, position_angle).into(),
        }
    }
}

/// Rotate an unrotated plane position so north tilts counter-clockwise by `pa`
pub(crate) fn rotate_plane(x: f64, y: f64, pa: f64) -> (f64, f64) {
    let (s, c) = pa.sin_cos();
    (x * c + y * s, -x * s + y * c)
}

/// Inverse of [`rotate_plane`]
pub(crate) fn unrotate_plane(x: f64, y: f64, pa: f64) -> (f64, f64) {
    let (s, c) = pa.sin_cos();
    (x * c - y * s, x * s + y * c)
}

/// Plane position at radius `r` and position angle `theta` about the centre
pub(crate) fn azimuthal_forward(r: f64, theta: f64, pa: f64) -> TangentPoint {
    let (s, c) = theta.sin_cos();
    let (x, y) = rotate_plane(-r * s, -r * c, pa);
    tp(x, y)
}

/// Radius and position angle (about the centre) of a plane position
pub(crate) fn azimuthal_inverse(t: TangentPoint, pa: f64) -> (f64, f64) {
    let (x, y) = unrotate_plane(t.x.0, t.y.0, pa);
    (x.hypot(y), (-x).atan2(-y))
}

pub(crate) fn undefined() -> TangentPoint {
    tp(f64::NAN, f64::NAN)
}

/// Everything that fixes a chart's projection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionConfig {
    pub kind: ProjectionKind,
    pub coords: CoordinateSystem,
    /// Chart centre in the chart's coordinate system (RA/Dec, l/b or az/alt)
    pub center: LonLat,
    /// Tilt of north counter-clockwise from up, radians
    pub position_angle: f64,
    /// Angular width across the chart, radians
    pub angular_width: f64,
    /// Number of latitude strips for [`ProjectionKind::MultiLatitude`]
    pub strips: u32,
    pub observer: Option<Observer>,
    /// Reject points below the observer's horizon
    pub clip_below_horizon: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            kind: ProjectionKind::Flat,
            coords: CoordinateSystem::RaDec,
            center: LonLat::new(0.0, 0.0),
            position_angle: 0.0,
            angular_width: 25f64.to_radians(),
            strips: 6,
            observer: None,
            clip_below_horizon: false,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = |field: &'static str| move |source: NumericError| ConfigError::InvalidValue { field, source };
        try_positive(self.angular_width).map_err(field("angular_width"))?;
        Rad::try_new(self.position_angle).map_err(field("position_angle"))?;
        Rad::try_new(self.center.lon).map_err(field("central longitude"))?;
        Rad::try_new(self.center.lat).map_err(field("central latitude"))?;

        let max = self.kind.max_angular_width();
        if self.angular_width >= max {
            return Err(ConfigError::TooWide {
                projection: self.kind.name(),
                width_deg: self.angular_width.to_degrees(),
                max_deg: max.to_degrees().round(),
            });
        }
        if self.kind == ProjectionKind::MultiLatitude && self.strips == 0 {
            return Err(ConfigError::NoStrips);
        }
        if self.clip_below_horizon && self.observer.is_none() {
            return Err(ConfigError::MissingObserver { what: "horizon clipping" });
        }
        Ok(())
    }
}

/// A chart's projection: coordinate conversion, the projection policy and
/// optional horizon clipping, fixed for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyProjection {
    converter: CoordinateConverter,
    projector: Projection,
    kind: ProjectionKind,
    angular_width: f64,
    /// J2000 zenith when clipping below the horizon
    horizon: Option<LonLat>,
}

impl SkyProjection {
    pub fn new(config: &ProjectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let converter = CoordinateConverter::new(config.coords, config.observer)?;
        let center = converter
            .convert_to_selected_coordinates(SkyPoint { pos: config.center, frame: config.coords.frame() });
        let projector = Projection::new(config.kind, center, config.position_angle, config.strips);
        let horizon = match (config.clip_below_horizon, config.observer) {
            (true, Some(observer)) => Some(observer.zenith_j2000()),
            _ => None,
        };
        debug!(
            projection = config.kind.name(),
            lon = center.lon,
            lat = center.lat,
            clip = horizon.is_some(),
            "projection ready"
        );
        Ok(SkyProjection {
            converter,
            projector,
            kind: config.kind,
            angular_width: config.angular_width,
            horizon,
        })
    }

    /// Project a point onto the tangent plane. Non-finite coordinates mean
    /// the point is outside the projection's domain, or below the horizon
    /// when clipping is on and `allow_below_horizon` is false.
    pub fn project(&self, point: SkyPoint, allow_below_horizon: bool) -> TangentPoint {
        if !allow_below_horizon && !self.is_above_horizon(point) {
            return undefined();
        }
        let q = self.converter.convert_to_selected_coordinates(point);
        if !q.is_finite() {
            return undefined();
        }
        self.projector.forward(q)
    }

    /// The sky point (in the chart's frame) under a tangent-plane position.
    /// Non-finite outside the projection's domain.
    pub fn inverse_project(&self, t: TangentPoint) -> SkyPoint {
        if !t.is_finite() {
            return self.converter.convert_from_selected_coordinates(LonLat::nan());
        }
        let q = self.projector.inverse(t);
        self.converter.convert_from_selected_coordinates(q)
    }

    /// Whether `point` survives horizon clipping. Always true without it.
    pub fn is_above_horizon(&self, point: SkyPoint) -> bool {
        let Some(zenith) = self.horizon else {
            return true;
        };
        let j2000 = self.converter.to_j2000(point);
        ang_dist(j2000, zenith) <= FRAC_PI_2
    }

    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn projector(&self) -> &Projection {
        &self.projector
    }

    /// Extent of the chart's angular width on the tangent plane
    pub fn linear_width(&self) -> f64 {
        self.projector.linear_width(self.angular_width)
    }
}
