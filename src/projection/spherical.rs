//! Stereographic projection: conformal, and defined everywhere except the
//! point opposite the centre.

use std::f64::consts::PI;

use super::{PlaneProjector, azimuthal_forward, azimuthal_inverse, undefined};
use crate::sphtrig::{LonLat, inv_position_angle, offset_from};
use crate::types::TangentPoint;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    center: LonLat,
    position_angle: f64,
}

impl Spherical {
    pub fn new(center: LonLat, position_angle: f64) -> Self {
        Spherical { center, position_angle }
    }
}

impl PlaneProjector for Spherical {
    fn forward(&self, p: LonLat) -> TangentPoint {
        let (dist, theta) = offset_from(self.center, p);
        if PI - dist < 1e-10 {
            return undefined();
        }
        azimuthal_forward(2.0 * (dist / 2.0).tan(), theta, self.position_angle)
    }

    fn inverse(&self, t: TangentPoint) -> LonLat {
        let (r, theta) = azimuthal_inverse(t, self.position_angle);
        inv_position_angle(self.center, theta, 2.0 * (r / 2.0).atan())
    }

    fn linear_width(&self, angular_width: f64) -> f64 {
        4.0 * (angular_width / 4.0).tan()
    }
}
