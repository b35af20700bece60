//! Celestial reference frames and conversions between them.
//!
//! Every [`SkyPoint`] carries its [`Frame`]; crossing frames always goes
//! through an explicit conversion here, with J2000 equatorial as the hub.

pub mod time;

use std::f64::consts::{FRAC_PI_2, TAU};

pub use time::JulianDate;

use crate::errors::ConfigError;
use crate::sphtrig::{LonLat, inv_position_angle, offset_from};

/// North galactic pole, J2000 right ascension
const RA_GP: f64 = 192.85948 * std::f64::consts::PI / 180.0;
/// North galactic pole, J2000 declination
const DEC_GP: f64 = 27.12825 * std::f64::consts::PI / 180.0;
/// Galactic longitude of the north celestial pole (J2000)
const L_CP: f64 = 122.93192 * std::f64::consts::PI / 180.0;

/// The reference frame a point on the sky is expressed in
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Right ascension and declination, mean equator and equinox of J2000.0
    EquatorialJ2000,
    /// Right ascension and declination, mean equator and equinox of date
    EquatorialAtEpoch(JulianDate),
    /// Galactic longitude and latitude
    Galactic,
    /// Azimuth (north through east) and altitude for the chart's observer
    Horizontal,
}

/// A direction on the sky in a known frame (radians)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyPoint {
    pub pos: LonLat,
    pub frame: Frame,
}

impl SkyPoint {
    pub fn new(lon: f64, lat: f64, frame: Frame) -> Self {
        SkyPoint { pos: LonLat::new(lon, lat), frame }
    }

    /// J2000 position from right ascension in hours and declination in degrees
    pub fn ra_dec(ra_hours: f64, dec_degrees: f64) -> Self {
        SkyPoint::new(
            (ra_hours * 15.0).to_radians(),
            dec_degrees.to_radians(),
            Frame::EquatorialJ2000,
        )
    }

    pub fn galactic(l: f64, b: f64) -> Self {
        SkyPoint::new(l, b, Frame::Galactic)
    }

    pub fn horizontal(azimuth: f64, altitude: f64) -> Self {
        SkyPoint::new(azimuth, altitude, Frame::Horizontal)
    }

    pub fn lon(&self) -> f64 {
        self.pos.lon
    }

    pub fn lat(&self) -> f64 {
        self.pos.lat
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite()
    }
}

/// The coordinate system a chart is drawn in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CoordinateSystem {
    #[default]
    RaDec,
    Galactic,
    AltAz,
}

impl CoordinateSystem {
    /// Frame of points in this system
    pub fn frame(self) -> Frame {
        match self {
            CoordinateSystem::RaDec => Frame::EquatorialJ2000,
            CoordinateSystem::Galactic => Frame::Galactic,
            CoordinateSystem::AltAz => Frame::Horizontal,
        }
    }
}

/// A place on Earth at an instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    /// Geographic latitude, radians
    pub latitude: f64,
    /// Geographic longitude, radians, east positive
    pub longitude: f64,
    pub time: JulianDate,
}

impl Observer {
    pub fn from_degrees(latitude: f64, longitude: f64, time: JulianDate) -> Self {
        Observer {
            latitude: latitude.to_radians(),
            longitude: longitude.to_radians(),
            time,
        }
    }

    /// Zenith in equatorial coordinates of date
    pub fn zenith(&self) -> LonLat {
        time::zenith_position(self.latitude, self.longitude, self.time)
    }

    /// Zenith in J2000 equatorial coordinates
    pub fn zenith_j2000(&self) -> LonLat {
        time::epoch_to_j2000(self.zenith(), self.time)
    }
}

/// J2000 equatorial to galactic
pub fn galactic_from_j2000(p: LonLat) -> LonLat {
    let (sin_dec, cos_dec) = p.lat.sin_cos();
    let (sin_gp, cos_gp) = DEC_GP.sin_cos();
    let d_ra = p.lon - RA_GP;

    let b = (sin_dec * sin_gp + cos_gp * cos_dec * d_ra.cos()).clamp(-1.0, 1.0).asin();
    let l_sin = cos_dec * d_ra.sin();
    let l_cos = cos_gp * sin_dec - sin_gp * cos_dec * d_ra.cos();
    let l = L_CP - l_sin.atan2(l_cos);
    LonLat::new(l, b).normalized()
}

/// Galactic to J2000 equatorial
pub fn j2000_from_galactic(p: LonLat) -> LonLat {
    let (sin_b, cos_b) = p.lat.sin_cos();
    let (sin_gp, cos_gp) = DEC_GP.sin_cos();
    let d_l = L_CP - p.lon;

    let dec = (sin_b * sin_gp + cos_gp * cos_b * d_l.cos()).clamp(-1.0, 1.0).asin();
    let r_sin = cos_b * d_l.sin();
    let r_cos = cos_gp * sin_b - sin_gp * cos_b * d_l.cos();
    let ra = RA_GP + r_sin.atan2(r_cos);
    LonLat::new(ra, dec).normalized()
}

/// Azimuth (north through east) and altitude of an equatorial position of date
pub fn alt_az(p_of_date: LonLat, observer: &Observer) -> LonLat {
    let (zenith_angle, azimuth) = offset_from(observer.zenith(), p_of_date);
    LonLat::new(azimuth.rem_euclid(TAU), FRAC_PI_2 - zenith_angle)
}

/// Equatorial position of date of an azimuth/altitude pair
pub fn inv_alt_az(horizontal: LonLat, observer: &Observer) -> LonLat {
    inv_position_angle(observer.zenith(), horizontal.lon, FRAC_PI_2 - horizontal.lat).normalized()
}

/// Converts between [`SkyPoint`]s and the longitude/latitude a chart is
/// drawn in.
///
/// In the alt/az system the chart longitude is minus the azimuth, so that
/// with the zenith up the azimuth grows to the right like on the real sky.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateConverter {
    system: CoordinateSystem,
    observer: Option<Observer>,
}

impl CoordinateConverter {
    pub fn new(system: CoordinateSystem, observer: Option<Observer>) -> Result<Self, ConfigError> {
        if system == CoordinateSystem::AltAz && observer.is_none() {
            return Err(ConfigError::MissingObserver { what: "the alt/az coordinate system" });
        }
        Ok(CoordinateConverter { system, observer })
    }

    pub fn system(&self) -> CoordinateSystem {
        self.system
    }

    pub fn observer(&self) -> Option<&Observer> {
        self.observer.as_ref()
    }

    /// Any point to J2000 equatorial. Horizontal points without an observer
    /// have no equatorial position and come back non-finite.
    pub fn to_j2000(&self, p: SkyPoint) -> LonLat {
        match p.frame {
            Frame::EquatorialJ2000 => p.pos,
            Frame::EquatorialAtEpoch(jd) => time::epoch_to_j2000(p.pos, jd),
            Frame::Galactic => j2000_from_galactic(p.pos),
            Frame::Horizontal => match &self.observer {
                Some(observer) => time::epoch_to_j2000(inv_alt_az(p.pos, observer), observer.time),
                None => LonLat::nan(),
            },
        }
    }

    /// J2000 equatorial to the given frame
    pub fn j2000_to_frame(&self, p: LonLat, frame: Frame) -> SkyPoint {
        let pos = match frame {
            Frame::EquatorialJ2000 => p,
            Frame::EquatorialAtEpoch(jd) => time::j2000_to_epoch(p, jd).normalized(),
            Frame::Galactic => galactic_from_j2000(p),
            Frame::Horizontal => match &self.observer {
                Some(observer) => alt_az(time::j2000_to_epoch(p, observer.time), observer),
                None => LonLat::nan(),
            },
        };
        SkyPoint { pos, frame }
    }

    /// A point in any frame to chart longitude/latitude
    pub fn convert_to_selected_coordinates(&self, p: SkyPoint) -> LonLat {
        let target = self.system.frame();
        let native = if p.frame == target {
            p.pos
        } else {
            self.j2000_to_frame(self.to_j2000(p), target).pos
        };
        match self.system {
            CoordinateSystem::AltAz => LonLat::new(-native.lon, native.lat),
            _ => native,
        }
    }

    /// Chart longitude/latitude back to a point in the chart's frame
    pub fn convert_from_selected_coordinates(&self, q: LonLat) -> SkyPoint {
        let pos = match self.system {
            CoordinateSystem::AltAz => LonLat::new((-q.lon).rem_euclid(TAU), q.lat),
            _ => q.normalized(),
        };
        SkyPoint { pos, frame: self.system.frame() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphtrig::{ang_dist, wrap_pi};

    fn observer() -> Observer {
        // Cambridge, 2024 March 1, 21h UT
        Observer::from_degrees(52.2, 0.12, JulianDate(2460371.375))
    }

    #[test]
    fn galactic_centre_is_at_origin() {
        let gc = LonLat::from_degrees(266.40510, -28.936175);
        let g = galactic_from_j2000(gc);
        assert!(wrap_pi(g.lon).to_degrees().abs() < 0.01, "l = {}", g.lon.to_degrees());
        assert!(g.lat.to_degrees().abs() < 0.01, "b = {}", g.lat.to_degrees());
    }

    #[test]
    fn galactic_pole() {
        let g = galactic_from_j2000(LonLat::new(RA_GP, DEC_GP));
        assert!((g.lat - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn galactic_round_trip() {
        for (ra, dec) in [(10.0, 20.0), (200.0, -60.0), (359.0, 89.0), (45.0, -5.0)] {
            let p = LonLat::from_degrees(ra, dec);
            let back = j2000_from_galactic(galactic_from_j2000(p));
            assert!(ang_dist(p, back) < 1e-12, "{ra} {dec}");
        }
    }

    #[test]
    fn celestial_pole_altitude_is_latitude() {
        let obs = observer();
        let pole = LonLat::new(0.0, FRAC_PI_2);
        let h = alt_az(pole, &obs);
        assert!((h.lat - obs.latitude).abs() < 1e-12);
        assert!(wrap_pi(h.lon).abs() < 1e-9, "pole should be due north");
    }

    #[test]
    fn zenith_has_altitude_ninety() {
        let obs = observer();
        let h = alt_az(obs.zenith(), &obs);
        assert!((h.lat - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn alt_az_round_trip() {
        let obs = observer();
        let p = LonLat::from_degrees(80.0, 10.0);
        let back = inv_alt_az(alt_az(p, &obs), &obs);
        assert!(ang_dist(p, back) < 1e-12);
    }

    #[test]
    fn alt_az_requires_an_observer() {
        let err = CoordinateConverter::new(CoordinateSystem::AltAz, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingObserver { .. }));
    }

    #[test]
    fn horizontal_point_without_observer_is_undefined() {
        let conv = CoordinateConverter::new(CoordinateSystem::RaDec, None).unwrap();
        let q = conv.convert_to_selected_coordinates(SkyPoint::horizontal(0.0, 0.5));
        assert!(!q.is_finite());
    }

    #[test]
    fn selected_coordinates_round_trip_in_every_system() {
        let systems = [CoordinateSystem::RaDec, CoordinateSystem::Galactic, CoordinateSystem::AltAz];
        let p = SkyPoint::ra_dec(5.5, -12.0);
        for system in systems {
            let conv = CoordinateConverter::new(system, Some(observer())).unwrap();
            let q = conv.convert_to_selected_coordinates(p);
            let back = conv.convert_from_selected_coordinates(q);
            assert_eq!(back.frame, system.frame());
            let j2000 = conv.to_j2000(back);
            assert!(ang_dist(j2000, p.pos) < 1e-10, "{system:?}");
        }
    }

    #[test]
    fn alt_az_chart_longitude_is_negated_azimuth() {
        let conv = CoordinateConverter::new(CoordinateSystem::AltAz, Some(observer())).unwrap();
        let q = conv.convert_to_selected_coordinates(SkyPoint::horizontal(1.0, 0.3));
        assert_eq!(q, LonLat::new(-1.0, 0.3));
        let back = conv.convert_from_selected_coordinates(q);
        assert!((back.lon() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn epoch_frames_convert_through_precession() {
        let conv = CoordinateConverter::new(CoordinateSystem::RaDec, None).unwrap();
        let jd = JulianDate(2469807.5);
        let p = SkyPoint::ra_dec(6.0, 30.0);
        let at_epoch = conv.j2000_to_frame(p.pos, Frame::EquatorialAtEpoch(jd));
        assert!(ang_dist(at_epoch.pos, p.pos) > 1e-3);
        let q = conv.convert_to_selected_coordinates(at_epoch);
        assert!(ang_dist(q, p.pos) < 1e-12);
    }
}
