//! Spherical trigonometry on the unit sphere.
//!
//! Everything here is stateless and frame-agnostic: a [`LonLat`] is a
//! longitude/latitude pair in radians, whichever frame the caller means.
//! Cartesian form uses x towards (0, 0), y towards (90°, 0) and z towards
//! the pole.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;

/// A direction on the unit sphere (radians)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        LonLat { lon, lat }
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        LonLat { lon: lon.to_radians(), lat: lat.to_radians() }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// The undefined point, used as the out-of-domain result
    pub const fn nan() -> Self {
        LonLat { lon: f64::NAN, lat: f64::NAN }
    }

    pub fn to_vector(self) -> DVec3 {
        let (sin_lon, cos_lon) = self.lon.sin_cos();
        let (sin_lat, cos_lat) = self.lat.sin_cos();
        DVec3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat)
    }

    /// Inverse of [`to_vector`](Self::to_vector); the input need not be normalized.
    pub fn from_vector(v: DVec3) -> Self {
        let lon = v.y.atan2(v.x);
        let lat = v.z.atan2(v.x.hypot(v.y));
        LonLat { lon, lat }
    }

    /// Same point with the longitude wrapped into `[0, 2π)`
    pub fn normalized(self) -> Self {
        LonLat { lon: self.lon.rem_euclid(TAU), lat: self.lat }
    }
}

/// Wrap an angle into `[-π, π)`
pub fn wrap_pi(angle: f64) -> f64 {
    use std::f64::consts::PI;
    (angle + PI).rem_euclid(TAU) - PI
}

/// Rotate a vector about the z axis by `theta`
pub fn rotate_xy(v: DVec3, theta: f64) -> DVec3 {
    let (s, c) = theta.sin_cos();
    DVec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Rotate a vector about the y axis by `theta` (x towards z for positive angles)
pub fn rotate_xz(v: DVec3, theta: f64) -> DVec3 {
    let (s, c) = theta.sin_cos();
    DVec3::new(v.x * c - v.z * s, v.y, v.x * s + v.z * c)
}

/// Angular separation of two points, from the chord length.
///
/// Stays accurate for tiny separations where the arccos of a dot product
/// loses all precision.
pub fn ang_dist(a: LonLat, b: LonLat) -> f64 {
    let chord = a.to_vector().distance(b.to_vector());
    if chord <= 0.0 {
        return 0.0;
    }
    2.0 * (chord / 2.0).min(1.0).asin()
}

/// Express `p` in a frame where `center` sits on the +z pole and the
/// north pole of the input frame lies along -x.
fn to_center_frame(center: LonLat, p: LonLat) -> DVec3 {
    let v = rotate_xy(p.to_vector(), -center.lon);
    rotate_xz(v, FRAC_PI_2 - center.lat)
}

fn from_center_frame(center: LonLat, v: DVec3) -> LonLat {
    let v = rotate_xz(v, center.lat - FRAC_PI_2);
    LonLat::from_vector(rotate_xy(v, center.lon))
}

/// Bearing of the great circle from `from` towards `to`, measured from north
/// through east. Coincident points have a position angle of 0.
pub fn position_angle(from: LonLat, to: LonLat) -> f64 {
    offset_from(from, to).1
}

/// Angular distance and position angle of `p` seen from `center`, in one pass.
pub fn offset_from(center: LonLat, p: LonLat) -> (f64, f64) {
    let v = to_center_frame(center, p);
    let transverse = v.x.hypot(v.y);
    let dist = transverse.atan2(v.z);
    if transverse < 1e-13 {
        return (dist, 0.0);
    }
    (dist, v.y.atan2(-v.x))
}

/// The point at angular distance `dist` from `from`, along position angle `pa`.
pub fn inv_position_angle(from: LonLat, pa: f64, dist: f64) -> LonLat {
    let (sin_d, cos_d) = dist.sin_cos();
    let (sin_pa, cos_pa) = pa.sin_cos();
    let v = DVec3::new(-cos_pa * sin_d, sin_pa * sin_d, cos_d);
    from_center_frame(from, v)
}

/// Angle ABC at vertex B between the chords BA and BC. Degenerate
/// (zero-length) sides give 0.
pub fn angle_abc(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let ab2 = a.distance_squared(b);
    let bc2 = b.distance_squared(c);
    let ca2 = c.distance_squared(a);
    let denom = 2.0 * ab2.sqrt() * bc2.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    let cosine = (ab2 + bc2 - ca2) / denom;
    if cosine >= 1.0 {
        return 0.0;
    }
    cosine.max(-1.0).acos()
}

/// Zenith angle and azimuth of `p` as seen from an observer whose zenith is
/// `zenith`. The azimuth is counted from the meridian below the pole
/// (south for an observer in the north) towards the east, and is 0 when the
/// point is at the zenith or nadir.
pub fn make_zenithal(p: LonLat, zenith: LonLat) -> (f64, f64) {
    let v = to_center_frame(zenith, p);
    let altitude = v.z.atan2(v.x.hypot(v.y));
    let azimuth = if altitude.cos().abs() < 1e-7 { 0.0 } else { v.y.atan2(v.x) };
    (FRAC_PI_2 - altitude, azimuth)
}

/// Centroid of a set of directions. `None` for an empty set or when the
/// directions cancel out.
pub fn mean_position(points: &[LonLat]) -> Option<LonLat> {
    let sum: DVec3 = points.iter().map(|p| p.to_vector()).sum();
    if sum.length() < 1e-12 {
        return None;
    }
    Some(LonLat::from_vector(sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn distance_along_equator_and_meridian() {
        let a = LonLat::from_degrees(10.0, 0.0);
        let b = LonLat::from_degrees(40.0, 0.0);
        assert!(close(ang_dist(a, b), 30f64.to_radians()));

        let c = LonLat::from_degrees(123.0, -20.0);
        let d = LonLat::from_degrees(123.0, 45.0);
        assert!(close(ang_dist(c, d), 65f64.to_radians()));
    }

    #[test]
    fn distance_to_antipode_is_pi() {
        let a = LonLat::from_degrees(0.0, 30.0);
        let b = LonLat::from_degrees(180.0, -30.0);
        assert!(close(ang_dist(a, b), PI));
    }

    #[test]
    fn distance_is_precise_for_tiny_separations() {
        let a = LonLat::new(1.0, 0.5);
        let b = LonLat::new(1.0, 0.5 + 1e-10);
        assert!((ang_dist(a, b) - 1e-10).abs() < 1e-14);
    }

    #[test]
    fn position_angle_cardinal_directions() {
        let origin = LonLat::from_degrees(30.0, 20.0);
        let north = LonLat::from_degrees(30.0, 25.0);
        let east = LonLat::from_degrees(32.0, 20.0);
        let south = LonLat::from_degrees(30.0, 15.0);

        assert!(close(position_angle(origin, north), 0.0));
        assert!(close(position_angle(origin, east), FRAC_PI_2));
        assert!(close(position_angle(origin, south).abs(), PI));
    }

    #[test]
    fn position_angle_of_point_to_itself_is_zero() {
        let p = LonLat::from_degrees(200.0, -45.0);
        assert_eq!(position_angle(p, p), 0.0);
    }

    #[test]
    fn inverse_position_angle_round_trips() {
        let from = LonLat::from_degrees(75.0, -33.0);
        for (pa, dist) in [(0.3, 0.1), (2.0, 1.2), (-1.0, 2.5), (3.0, 0.001)] {
            let p = inv_position_angle(from, pa, dist);
            let (d, a) = offset_from(from, p);
            assert!(close(d, dist), "distance {d} vs {dist}");
            assert!(close(wrap_pi(a - pa), 0.0), "pa {a} vs {pa}");
        }
    }

    #[test]
    fn rotations_preserve_length() {
        let v = DVec3::new(0.3, -0.4, 0.5);
        assert!((rotate_xy(v, 1.1).length() - v.length()).abs() < EPS);
        assert!((rotate_xz(v, -2.3).length() - v.length()).abs() < EPS);
        let back = rotate_xz(rotate_xz(v, 0.7), -0.7);
        assert!(back.distance(v) < EPS);
    }

    #[test]
    fn zenithal_coordinates() {
        let zenith = LonLat::from_degrees(100.0, 40.0);
        let (za, az) = make_zenithal(zenith, zenith);
        assert!(za.abs() < 1e-9);
        assert_eq!(az, 0.0);

        let p = LonLat::from_degrees(100.0, 10.0);
        let (za, az) = make_zenithal(p, zenith);
        assert!(close(za, 30f64.to_radians()));
        // Due south of a northern zenith
        assert!(close(az, 0.0));
    }

    #[test]
    fn right_angle_at_b() {
        let a = DVec3::X;
        let b = DVec3::ZERO;
        let c = DVec3::Y;
        assert!(close(angle_abc(a, b, c), FRAC_PI_2));
        assert_eq!(angle_abc(a, a, c), 0.0);
    }

    #[test]
    fn mean_of_symmetric_points() {
        let points = [LonLat::from_degrees(10.0, 0.0), LonLat::from_degrees(30.0, 0.0)];
        let mean = mean_position(&points).unwrap();
        assert!(close(mean.lon, 20f64.to_radians()));
        assert!(close(mean.lat, 0.0));

        assert_eq!(mean_position(&[]), None);
        let opposite = [LonLat::from_degrees(0.0, 0.0), LonLat::from_degrees(180.0, 0.0)];
        assert_eq!(mean_position(&opposite), None);
    }

    #[test]
    fn wrap_pi_range() {
        assert!(close(wrap_pi(3.0 * PI / 2.0), -FRAC_PI_2));
        assert!(close(wrap_pi(-3.0 * PI / 2.0), FRAC_PI_2));
        assert!(close(wrap_pi(0.25), 0.25));
    }
}
