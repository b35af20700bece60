//! Strongly-typed numeric primitives for starcharter (zero-cost newtypes).
//!
//! Two planar unit systems exist side by side:
//! - [`Rad`]: distances on the tangent plane, in radians
//! - [`Px`]: distances on the output canvas, in points at the configured DPI
//!
//! The only way between them is a [`CanvasTransform`](crate::canvas::CanvasTransform).

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate a strictly positive, finite value (widths, scales, DPI).
pub fn try_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Validate a finite value of any sign (offsets).
pub fn try_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// A planar unit: a transparent `f64` wrapper with arithmetic.
pub trait Unit:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + Neg<Output = Self>
{
    fn from_raw(val: f64) -> Self;
    fn raw(self) -> f64;

    fn min(self, other: Self) -> Self {
        Self::from_raw(self.raw().min(other.raw()))
    }

    fn max(self, other: Self) -> Self {
        Self::from_raw(self.raw().max(other.raw()))
    }
}

macro_rules! unit_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
        #[repr(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: $name = $name(0.0);

            /// Create a value with validation (rejects NaN/infinite)
            #[inline]
            pub fn try_new(val: f64) -> Result<$name, NumericError> {
                if val.is_nan() {
                    Err(NumericError::NaN)
                } else if val.is_infinite() {
                    Err(NumericError::Infinite)
                } else {
                    Ok($name(val))
                }
            }

            /// Check if this value is finite (not NaN or infinite)
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            #[inline]
            pub fn abs(self) -> $name {
                $name(self.0.abs())
            }
        }

        impl Unit for $name {
            #[inline]
            fn from_raw(val: f64) -> Self {
                $name(val)
            }

            #[inline]
            fn raw(self) -> f64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name { $name(self.0 + rhs.0) }
        }
        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name { $name(self.0 - rhs.0) }
        }
        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name { $name(self.0 * rhs) }
        }
        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name { $name(self.0 / rhs) }
        }
        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name { $name(-self.0) }
        }
        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) { self.0 += rhs.0; }
        }
        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: $name) { self.0 -= rhs.0; }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

unit_newtype! {
    /// Distance on the tangent plane, in radians
    Rad
}

unit_newtype! {
    /// Distance on the output canvas, in points
    Px
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Point { x, y }
    }
}

impl<T: Unit> Point<T> {
    /// Both coordinates are finite; the only "inside the domain" test
    pub fn is_finite(&self) -> bool {
        self.x.raw().is_finite() && self.y.raw().is_finite()
    }

    /// Rotate about `origin` by `angle` radians (clockwise on a y-down plane).
    pub fn rotate_about(self, origin: Point<T>, angle: f64) -> Point<T> {
        let (s, c) = angle.sin_cos();
        let dx = (self.x - origin.x).raw();
        let dy = (self.y - origin.y).raw();
        Point {
            x: origin.x + T::from_raw(dx * c - dy * s),
            y: origin.y + T::from_raw(dx * s + dy * c),
        }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size<T> {
    pub w: T,
    pub h: T,
}

/// A displacement/offset vector (not an absolute position)
/// Use this for translations; Point + Offset = Point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset<T> {
    pub dx: T,
    pub dy: T,
}

impl<T> Offset<T> {
    pub fn new(dx: T, dy: T) -> Self {
        Offset { dx, dy }
    }
}

/// Add an offset to a point to get a new point
impl<T: Unit> Add<Offset<T>> for Point<T> {
    type Output = Point<T>;
    fn add(self, rhs: Offset<T>) -> Point<T> {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

/// Subtract two points to get an offset
impl<T: Unit> Sub<Point<T>> for Point<T> {
    type Output = Offset<T>;
    fn sub(self, rhs: Point<T>) -> Offset<T> {
        Offset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl<T: Unit> BBox<T> {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point { x: T::from_raw(f64::MAX), y: T::from_raw(f64::MAX) },
            max: Point { x: T::from_raw(f64::MIN), y: T::from_raw(f64::MIN) },
        }
    }

    /// Box spanning two corners given in any order
    pub fn from_corners(a: Point<T>, b: Point<T>) -> Self {
        let mut bb = Self::new();
        bb.expand_point(a);
        bb.expand_point(b);
        bb
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point<T>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Expand to include another box
    pub fn expand_bbox(&mut self, other: &BBox<T>) {
        if other.is_empty() {
            return;
        }
        self.expand_point(other.min);
        self.expand_point(other.max);
    }

    /// Grow outwards by `dx` on both sides horizontally and `dy` vertically
    pub fn pad(&self, dx: T, dy: T) -> BBox<T> {
        BBox {
            min: Point { x: self.min.x - dx, y: self.min.y - dy },
            max: Point { x: self.max.x + dx, y: self.max.y + dy },
        }
    }

    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Size<T> {
        Size { w: self.width(), h: self.height() }
    }

    pub fn center(&self) -> Point<T> {
        Point {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }

    /// Strict overlap: boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &BBox<T>) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// `other` lies entirely inside this box (edges inclusive)
    pub fn contains_bbox(&self, other: &BBox<T>) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    pub fn contains_point(&self, p: Point<T>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl<T: Unit> Default for BBox<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An RGB colour with components in 0..=1 (the chart file notation `r,g,b`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Colour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Colour {
    pub const BLACK: Colour = Colour { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Colour = Colour { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Colour { r, g, b }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::BLACK
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Convenient aliases
pub type TangentPoint = Point<Rad>;
pub type CanvasPoint = Point<Px>;
pub type TangentRect = BBox<Rad>;
pub type CanvasRect = BBox<Px>;

/// Shorthand constructor for tangent-plane points
#[inline]
pub fn tp(x: f64, y: f64) -> TangentPoint {
    Point::new(Rad(x), Rad(y))
}

/// Shorthand constructor for canvas points
#[inline]
pub fn cp(x: f64, y: f64) -> CanvasPoint {
    Point::new(Px(x), Px(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Unit tests ====================

    #[test]
    fn rad_try_new_valid() {
        assert!(Rad::try_new(1.0).is_ok());
        assert!(Rad::try_new(-1.0).is_ok());
    }

    #[test]
    fn rad_try_new_rejects_nan() {
        assert_eq!(Rad::try_new(f64::NAN), Err(NumericError::NaN));
    }

    #[test]
    fn px_try_new_rejects_infinity() {
        assert_eq!(Px::try_new(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(Px::try_new(f64::NEG_INFINITY), Err(NumericError::Infinite));
    }

    #[test]
    fn try_positive_rejects_zero_and_negative() {
        assert_eq!(try_positive(0.0), Err(NumericError::Zero));
        assert_eq!(try_positive(-2.0), Err(NumericError::Negative));
        assert_eq!(try_positive(72.0), Ok(72.0));
    }

    #[test]
    fn try_finite_accepts_any_sign() {
        assert_eq!(try_finite(-1.6), Ok(-1.6));
        assert_eq!(try_finite(0.0), Ok(0.0));
        assert_eq!(try_finite(f64::NAN), Err(NumericError::NaN));
        assert_eq!(try_finite(f64::INFINITY), Err(NumericError::Infinite));
    }

    #[test]
    fn unit_arithmetic() {
        let a = Px(3.0);
        let b = Px(2.0);

        assert_eq!(a + b, Px(5.0));
        assert_eq!(a - b, Px(1.0));
        assert_eq!(a * 2.0, Px(6.0));
        assert_eq!(a / 2.0, Px(1.5));
        assert_eq!(-a, Px(-3.0));
        assert_eq!(Unit::min(a, b), Px(2.0));
    }

    // ==================== Point/Offset tests ====================

    #[test]
    fn point_plus_offset_gives_point() {
        let p = cp(1.0, 2.0);
        let o = Offset::new(Px(3.0), Px(4.0));
        assert_eq!(p + o, cp(4.0, 6.0));
    }

    #[test]
    fn point_minus_point_gives_offset() {
        let offset = tp(5.0, 7.0) - tp(2.0, 3.0);
        assert_eq!(offset.dx, Rad(3.0));
        assert_eq!(offset.dy, Rad(4.0));
    }

    #[test]
    fn point_rotation_quarter_turn() {
        let p = cp(1.0, 0.0).rotate_about(cp(0.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert!(p.x.0.abs() < 1e-12);
        assert!((p.y.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nan_point_is_not_finite() {
        assert!(!tp(f64::NAN, 0.0).is_finite());
        assert!(tp(0.0, 0.0).is_finite());
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_new_is_empty() {
        assert!(BBox::<Rad>::new().is_empty());
    }

    #[test]
    fn bbox_from_corners_orders_them() {
        let bb = BBox::from_corners(cp(3.0, 1.0), cp(1.0, 4.0));
        assert_eq!(bb.min, cp(1.0, 1.0));
        assert_eq!(bb.max, cp(3.0, 4.0));
        assert_eq!(bb.width(), Px(2.0));
        assert_eq!(bb.height(), Px(3.0));
        assert_eq!(bb.center(), cp(2.0, 2.5));
    }

    #[test]
    fn bbox_touching_edges_do_not_intersect() {
        let a = BBox::from_corners(tp(0.0, 0.0), tp(1.0, 1.0));
        let b = BBox::from_corners(tp(1.0, 0.0), tp(2.0, 1.0));
        assert!(!a.intersects(&b));

        let c = BBox::from_corners(tp(0.5, 0.5), tp(2.0, 2.0));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn bbox_containment() {
        let outer = BBox::from_corners(tp(-1.0, -1.0), tp(1.0, 1.0));
        let inner = BBox::from_corners(tp(-0.5, -0.5), tp(1.0, 0.5));
        assert!(outer.contains_bbox(&inner));
        assert!(!inner.contains_bbox(&outer));
        assert!(outer.contains_point(tp(0.0, 1.0)));
        assert!(!outer.contains_point(tp(0.0, 1.1)));
    }

    #[test]
    fn bbox_pad_grows_both_sides() {
        let bb = BBox::from_corners(cp(0.0, 0.0), cp(2.0, 2.0)).pad(Px(1.0), Px(0.5));
        assert_eq!(bb.min, cp(-1.0, -0.5));
        assert_eq!(bb.max, cp(3.0, 2.5));
    }

    #[test]
    fn colour_display_uses_chart_notation() {
        assert_eq!(Colour::new(1.0, 0.5, 0.0).to_string(), "1,0.5,0");
    }
}
