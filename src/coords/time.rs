//! Julian dates, sidereal time and precession.

use std::f64::consts::TAU;

use glam::{DMat3, DVec3};

use crate::errors::CalendarError;
use crate::sphtrig::LonLat;

/// Seconds in a day
const DAY: f64 = 86400.0;

/// Mean obliquity of the ecliptic at J2000.0, arcseconds
const EPS0: f64 = 84381.406;

const ARCSEC: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// A Julian date (days, UT)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct JulianDate(pub f64);

impl JulianDate {
    /// 2000 January 1, 12h
    pub const J2000: JulianDate = JulianDate(2451545.0);
    /// 1970 January 1, 0h
    pub const UNIX_EPOCH: JulianDate = JulianDate(2440587.5);

    pub fn from_unix(seconds: f64) -> Self {
        JulianDate(seconds / DAY + Self::UNIX_EPOCH.0)
    }

    pub fn to_unix(self) -> f64 {
        DAY * (self.0 - Self::UNIX_EPOCH.0)
    }

    /// Julian centuries since J2000.0
    pub fn centuries_since_j2000(self) -> f64 {
        (self.0 - Self::J2000.0) / 36525.0
    }

    pub fn raw(self) -> f64 {
        self.0
    }

    /// Julian date of a civil date and time (UT).
    ///
    /// Dates up to 1752 September 2 are in the Julian calendar, dates from
    /// 1752 September 14 in the Gregorian one (the British switch-over).
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Self, CalendarError> {
        check_range("year", year as i64, -1_000_000, 1_000_000, "-1000000..=1000000")?;
        check_range("month", month as i64, 1, 12, "1..=12")?;
        check_range("day", day as i64, 1, 31, "1..=31")?;
        check_range("hour", hour as i64, 0, 23, "0..=23")?;
        check_range("minute", minute as i64, 0, 59, "0..=59")?;
        if !(0.0..60.0).contains(&second) {
            return Err(CalendarError::OutOfRange {
                field: "second",
                value: second as i64,
                range: "0..60",
            });
        }

        let required = 10000 * year as i64 + 100 * month as i64 + day as i64;
        let (mut y, mut m) = (year as i64, month as i64);
        if m <= 2 {
            m += 12;
            y -= 1;
        }

        let b = if required <= 17520902 {
            -2 + (y + 4716) / 4 - 1179
        } else if required >= 17520914 {
            y / 400 - y / 100 + y / 4
        } else {
            return Err(CalendarError::LostDay { year, month, day });
        };

        let jd = 365.0 * y as f64 - 679004.0
            + 2400000.5
            + b as f64
            + (30.6001 * (m + 1) as f64).floor()
            + day as f64;
        let day_fraction = (hour as f64 + minute as f64 / 60.0 + second / 3600.0) / 24.0;
        Ok(JulianDate(jd + day_fraction))
    }
}

fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
    range: &'static str,
) -> Result<(), CalendarError> {
    if value < min || value > max {
        return Err(CalendarError::OutOfRange { field, value, range });
    }
    Ok(())
}

/// Greenwich mean sidereal time, radians in `[0, 2π)`.
///
/// Meeus, *Astronomical Algorithms*, eq. 12.4.
pub fn greenwich_sidereal_time(jd: JulianDate) -> f64 {
    let d = jd.0 - JulianDate::J2000.0;
    let t = d / 36525.0;
    let degrees = 280.46061837 + 360.98564736629 * d + 0.000387933 * t * t - t * t * t / 38710000.0;
    degrees.to_radians().rem_euclid(TAU)
}

/// Right ascension and declination (of date) of the zenith for an observer
/// at `latitude`/`longitude` (radians, east positive).
pub fn zenith_position(latitude: f64, longitude: f64, jd: JulianDate) -> LonLat {
    let ra = (longitude + greenwich_sidereal_time(jd)).rem_euclid(TAU);
    LonLat::new(ra, latitude)
}

/// Rotation taking J2000 equatorial vectors to the mean equator and equinox
/// of `jd`.
///
/// Capitaine et al. (2003) four-angle form,
/// `P = R3(χA) · R1(−ωA) · R3(−ψA) · R1(ε0)`.
pub fn precession_matrix(jd: JulianDate) -> DMat3 {
    let t = jd.centuries_since_j2000();

    let psi_a = ((((-0.0000000951 * t + 0.000132851) * t - 0.00114045) * t - 1.0790069) * t
        + 5038.481507)
        * t;
    let omega_a =
        ((((0.0000003337 * t - 0.000000467) * t - 0.00772503) * t + 0.0512623) * t - 0.025754) * t
            + EPS0;
    let chi_a = ((((-0.0000000560 * t + 0.000170663) * t - 0.00121197) * t - 2.3814292) * t
        + 10.556403)
        * t;

    let (sa, ca) = (EPS0 * ARCSEC).sin_cos();
    let (sb, cb) = (-psi_a * ARCSEC).sin_cos();
    let (sc, cc) = (-omega_a * ARCSEC).sin_cos();
    let (sd, cd) = (chi_a * ARCSEC).sin_cos();

    let row0 = DVec3::new(
        cd * cb - sb * sd * cc,
        cd * sb * ca + sd * cc * cb * ca - sa * sd * sc,
        cd * sb * sa + sd * cc * cb * sa + ca * sd * sc,
    );
    let row1 = DVec3::new(
        -sd * cb - sb * cd * cc,
        -sd * sb * ca + cd * cc * cb * ca - sa * cd * sc,
        -sd * sb * sa + cd * cc * cb * sa + ca * cd * sc,
    );
    let row2 = DVec3::new(sb * sc, -sc * cb * ca - sa * cc, -sc * cb * sa + cc * ca);

    // glam matrices are column-major
    DMat3::from_cols(row0, row1, row2).transpose()
}

/// Precess a J2000 position to the mean equator of `jd`.
pub fn j2000_to_epoch(p: LonLat, jd: JulianDate) -> LonLat {
    LonLat::from_vector(precession_matrix(jd) * p.to_vector())
}

/// Precess a position referred to the mean equator of `jd` back to J2000.
pub fn epoch_to_j2000(p: LonLat, jd: JulianDate) -> LonLat {
    LonLat::from_vector(precession_matrix(jd).transpose() * p.to_vector())
}

/// Low-precision position of the Sun (J2000 equatorial), good to about 0.01°.
///
/// Meeus, *Astronomical Algorithms*, chapter 25.
pub fn sun_position(jd: JulianDate) -> LonLat {
    let t = jd.centuries_since_j2000();
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).to_radians();
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let true_longitude = (l0 + c).to_radians();
    let epsilon = (23.0 + 26.0 / 60.0 + 21.448 / 3600.0 - 46.8150 / 3600.0 * t
        - 0.00059 / 3600.0 * t * t
        + 0.001813 / 3600.0 * t * t * t)
        .to_radians();

    let (sin_l, cos_l) = true_longitude.sin_cos();
    let of_date = LonLat::new(
        (epsilon.cos() * sin_l).atan2(cos_l),
        (epsilon.sin() * sin_l).asin(),
    );
    epoch_to_j2000(of_date, jd).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphtrig::{ang_dist, wrap_pi};

    #[test]
    fn j2000_from_calendar() {
        let jd = JulianDate::from_calendar(2000, 1, 1, 12, 0, 0.0).unwrap();
        assert!((jd.0 - 2451545.0).abs() < 1e-9);
    }

    #[test]
    fn julian_calendar_dates() {
        // Meeus example 7.b: 333 January 27.5
        let jd = JulianDate::from_calendar(333, 1, 27, 12, 0, 0.0).unwrap();
        assert!((jd.0 - 1842713.0).abs() < 1e-9);
    }

    #[test]
    fn skipped_days_are_rejected() {
        let err = JulianDate::from_calendar(1752, 9, 5, 0, 0, 0.0).unwrap_err();
        assert_eq!(err, CalendarError::LostDay { year: 1752, month: 9, day: 5 });
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        assert!(matches!(
            JulianDate::from_calendar(2020, 13, 1, 0, 0, 0.0),
            Err(CalendarError::OutOfRange { field: "month", .. })
        ));
        assert!(matches!(
            JulianDate::from_calendar(2020, 1, 1, 24, 0, 0.0),
            Err(CalendarError::OutOfRange { field: "hour", .. })
        ));
    }

    #[test]
    fn unix_round_trip() {
        assert_eq!(JulianDate::from_unix(0.0), JulianDate::UNIX_EPOCH);
        let jd = JulianDate::from_unix(1_700_000_000.0);
        assert!((jd.to_unix() - 1_700_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn sidereal_time_matches_meeus_example() {
        // Meeus example 12.a: 1987 April 10, 0h UT -> 13h10m46.3668s
        let gmst = greenwich_sidereal_time(JulianDate(2446895.5));
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15f64.to_radians();
        assert!((gmst - expected).abs() < 1e-6, "{gmst} vs {expected}");
    }

    #[test]
    fn zenith_follows_longitude() {
        let jd = JulianDate(2446895.5);
        let greenwich = zenith_position(0.5, 0.0, jd);
        let east = zenith_position(0.5, 0.25, jd);
        assert!((wrap_pi(east.lon - greenwich.lon) - 0.25).abs() < 1e-12);
        assert_eq!(east.lat, 0.5);
    }

    #[test]
    fn precession_is_identity_at_j2000() {
        let m = precession_matrix(JulianDate::J2000);
        assert!(m.abs_diff_eq(DMat3::IDENTITY, 1e-12));
    }

    #[test]
    fn precession_over_a_century_moves_the_equinox() {
        // One century of general precession moves (0h, 0°) by about
        // +1.281° in right ascension and +0.557° in declination.
        let jd = JulianDate(JulianDate::J2000.0 + 36525.0);
        let p = j2000_to_epoch(LonLat::new(0.0, 0.0), jd);
        assert!((p.lon.to_degrees() - 1.281).abs() < 0.01, "{}", p.lon.to_degrees());
        assert!((p.lat.to_degrees() - 0.557).abs() < 0.01, "{}", p.lat.to_degrees());
    }

    #[test]
    fn precession_round_trip() {
        let jd = JulianDate(2460000.5);
        let p = LonLat::new(4.1, -0.7);
        let back = epoch_to_j2000(j2000_to_epoch(p, jd), jd);
        assert!(ang_dist(p, back) < 1e-12);
    }

    #[test]
    fn sun_at_the_march_equinox() {
        // 2000 March 20, 07:35 UT
        let sun = sun_position(JulianDate(2451623.816));
        assert!(wrap_pi(sun.lon).to_degrees().abs() < 0.05, "{}", sun.lon.to_degrees());
        assert!(sun.lat.to_degrees().abs() < 0.05, "{}", sun.lat.to_degrees());
    }
}
