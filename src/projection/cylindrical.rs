//! Cylindrical equal-area projection ("Peters").
//!
//! Longitude maps linearly to x and the sine of latitude to y, so the
//! whole sky fits on one sheet with its areas preserved.

use std::f64::consts::PI;

use super::{PlaneProjector, rotate_plane, unrotate_plane};
use crate::sphtrig::{LonLat, wrap_pi};
use crate::types::{TangentPoint, tp};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylindrical {
    center: LonLat,
    position_angle: f64,
}

impl Cylindrical {
    pub fn new(center: LonLat, position_angle: f64) -> Self {
        Cylindrical { center, position_angle }
    }
}

impl PlaneProjector for Cylindrical {
    fn forward(&self, p: LonLat) -> TangentPoint {
        let x = wrap_pi(self.center.lon - p.lon);
        let y = 2.0 * (self.center.lat.sin() - p.lat.sin());
        let (x, y) = rotate_plane(x, y, self.position_angle);
        tp(x, y)
    }

    fn inverse(&self, t: TangentPoint) -> LonLat {
        let (x, y) = unrotate_plane(t.x.0, t.y.0, self.position_angle);
        if x.abs() > PI {
            return LonLat::nan();
        }
        // asin of anything beyond ±1 is NaN, which marks the off-sky margin
        let lat = (self.center.lat.sin() - y / 2.0).asin();
        LonLat::new(self.center.lon - x, lat)
    }

    fn linear_width(&self, angular_width: f64) -> f64 {
        angular_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longitude_wraps_around_the_back_of_the_sky() {
        let projection = Cylindrical::new(LonLat::from_degrees(350.0, 0.0), 0.0);
        let t = projection.forward(LonLat::from_degrees(10.0, 0.0));
        assert!((t.x.0 + 20f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn poles_sit_on_the_edges() {
        let projection = Cylindrical::new(LonLat::new(0.0, 0.0), 0.0);
        let north = projection.forward(LonLat::from_degrees(123.0, 90.0));
        assert!((north.y.0 + 2.0).abs() < 1e-12);
    }

    #[test]
    fn beyond_the_poles_is_off_the_sky() {
        let projection = Cylindrical::new(LonLat::new(0.0, 0.0), 0.0);
        assert!(!projection.inverse(tp(0.0, -2.5)).is_finite());
        assert!(!projection.inverse(tp(3.5, 0.0)).is_finite());
    }
}
