//! Gnomonic projection: great circles map to straight lines.

use std::f64::consts::FRAC_PI_2;

use super::{PlaneProjector, azimuthal_forward, azimuthal_inverse, undefined};
use crate::sphtrig::{LonLat, inv_position_angle, offset_from};
use crate::types::TangentPoint;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flat {
    center: LonLat,
    position_angle: f64,
}

impl Flat {
    pub fn new(center: LonLat, position_angle: f64) -> Self {
        Flat { center, position_angle }
    }
}

impl PlaneProjector for Flat {
    fn forward(&self, p: LonLat) -> TangentPoint {
        let (dist, theta) = offset_from(self.center, p);
        // Only the hemisphere facing the centre has a tangent-plane image
        if dist >= FRAC_PI_2 {
            return undefined();
        }
        azimuthal_forward(dist.tan(), theta, self.position_angle)
    }

    fn inverse(&self, t: TangentPoint) -> LonLat {
        let (r, theta) = azimuthal_inverse(t, self.position_angle);
        inv_position_angle(self.center, theta, r.atan())
    }

    fn linear_width(&self, angular_width: f64) -> f64 {
        2.0 * (angular_width / 2.0).tan()
    }
}
