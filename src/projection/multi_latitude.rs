//! Multi-latitude strip projection.
//!
//! Latitude maps linearly to y. The latitude range is cut into equal
//! strips and the horizontal scale at any latitude is the linear
//! interpolation of `cos(latitude)` between the strip's edges, so the
//! scale is continuous across strip boundaries and exact on them.

use std::f64::consts::{FRAC_PI_2, PI};

use super::{PlaneProjector, rotate_plane, unrotate_plane};
use crate::sphtrig::{LonLat, wrap_pi};
use crate::types::{TangentPoint, tp};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultiLatitude {
    center: LonLat,
    position_angle: f64,
    strips: u32,
}

impl MultiLatitude {
    pub fn new(center: LonLat, position_angle: f64, strips: u32) -> Self {
        MultiLatitude { center, position_angle, strips: strips.max(1) }
    }

    /// Horizontal scale factor at `lat`
    pub fn scale(&self, lat: f64) -> f64 {
        let n = self.strips as f64;
        let strip_height = PI / n;
        let offset = (lat + FRAC_PI_2) / strip_height;
        let index = offset.floor().clamp(0.0, n - 1.0);
        let lower = -FRAC_PI_2 + index * strip_height;
        let upper = lower + strip_height;
        let t = ((lat - lower) / strip_height).clamp(0.0, 1.0);
        (lower.cos() * (1.0 - t) + upper.cos() * t).max(0.0)
    }
}

impl PlaneProjector for MultiLatitude {
    fn forward(&self, p: LonLat) -> TangentPoint {
        let x = -wrap_pi(p.lon - self.center.lon) * self.scale(p.lat);
        let y = self.center.lat - p.lat;
        let (x, y) = rotate_plane(x, y, self.position_angle);
        tp(x, y)
    }

    fn inverse(&self, t: TangentPoint) -> LonLat {
        let (x, y) = unrotate_plane(t.x.0, t.y.0, self.position_angle);
        let lat = self.center.lat - y;
        if lat.abs() > FRAC_PI_2 {
            return LonLat::nan();
        }
        let k = self.scale(lat);
        if k < 1e-12 {
            // Pole: every longitude is the same point
            return if x.abs() < 1e-12 { LonLat::new(self.center.lon, lat) } else { LonLat::nan() };
        }
        let d_lon = -x / k;
        if d_lon.abs() > PI {
            return LonLat::nan();
        }
        LonLat::new(self.center.lon + d_lon, lat)
    }

    fn linear_width(&self, angular_width: f64) -> f64 {
        angular_width
    }
}
