//! Candidate position generators shared by every object type.
//!
//! Each generator returns candidates in preference order. The per-type
//! offsets keep the spacing object labels have always had.

use std::f64::consts::FRAC_1_SQRT_2;

use super::{Candidate, HAlign, VAlign};
use crate::canvas::CanvasTransform;
use crate::types::{Px, TangentPoint};

/// How many compass positions to try around an anchor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CompassPoints {
    /// Right, then left
    Two,
    /// Right, left, below, above
    #[default]
    Four,
    /// The four sides, then the diagonals
    Eight,
}

/// Candidates around a round symbol, `offset` away from the anchor.
pub fn compass_candidates(anchor: TangentPoint, offset: Px, points: CompassPoints) -> Vec<Candidate> {
    let d = offset;
    let mut out = vec![
        Candidate::new(anchor, HAlign::Left, VAlign::Middle).with_offset(d, Px::ZERO),
        Candidate::new(anchor, HAlign::Right, VAlign::Middle).with_offset(-d, Px::ZERO),
    ];
    if points == CompassPoints::Two {
        return out;
    }
    out.push(Candidate::new(anchor, HAlign::Centre, VAlign::Top).with_offset(Px::ZERO, d));
    out.push(Candidate::new(anchor, HAlign::Centre, VAlign::Bottom).with_offset(Px::ZERO, -d));
    if points == CompassPoints::Four {
        return out;
    }
    let k = d * FRAC_1_SQRT_2;
    out.push(Candidate::new(anchor, HAlign::Left, VAlign::Bottom).with_offset(k, -k));
    out.push(Candidate::new(anchor, HAlign::Right, VAlign::Bottom).with_offset(-k, -k));
    out.push(Candidate::new(anchor, HAlign::Left, VAlign::Top).with_offset(k, k));
    out.push(Candidate::new(anchor, HAlign::Right, VAlign::Top).with_offset(-k, k));
    out
}

/// Four candidates on the rim of an elliptical outline (galaxies), at the
/// ends of both axes. `axis_angle` is the direction of the major axis on
/// the canvas, measured from down towards right, in radians.
pub fn ellipse_rim_candidates(
    anchor: TangentPoint,
    major_radius: Px,
    minor_radius: Px,
    axis_angle: f64,
) -> Vec<Candidate> {
    (0..4)
        .map(|k| {
            let theta = axis_angle + k as f64 * std::f64::consts::FRAC_PI_2;
            let r = if k % 2 == 0 { major_radius } else { minor_radius };
            rim_candidate(anchor, r, theta)
        })
        .collect()
}

/// Label just outside the rim point at angle `theta`, aligned away from
/// the centre
fn rim_candidate(anchor: TangentPoint, r: Px, theta: f64) -> Candidate {
    let (s, c) = theta.sin_cos();
    let deg = theta.to_degrees().rem_euclid(360.0);
    let (h, v) = if !(45.0..315.0).contains(&deg) {
        (HAlign::Centre, VAlign::Top)
    } else if deg < 135.0 {
        (HAlign::Left, VAlign::Middle)
    } else if deg < 225.0 {
        (HAlign::Centre, VAlign::Bottom)
    } else {
        (HAlign::Right, VAlign::Middle)
    };
    Candidate::new(anchor, h, v).with_offset(r * s, r * c)
}

/// Gap between a star's centre and its label
pub fn star_label_offset(radius: Px, canvas: &CanvasTransform) -> Px {
    radius + Px(0.075 * canvas.cm())
}

/// Gap between a deep-sky object's centre and its label
pub fn dso_label_offset(radius: Px, canvas: &CanvasTransform) -> Px {
    Px(0.8 * canvas.mm()) + radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasLayout;
    use crate::types::tp;

    #[test]
    fn compass_counts() {
        let a = tp(0.0, 0.0);
        assert_eq!(compass_candidates(a, Px(3.0), CompassPoints::Two).len(), 2);
        assert_eq!(compass_candidates(a, Px(3.0), CompassPoints::Four).len(), 4);
        assert_eq!(compass_candidates(a, Px(3.0), CompassPoints::Eight).len(), 8);
    }

    #[test]
    fn right_comes_first() {
        let c = compass_candidates(tp(0.0, 0.0), Px(3.0), CompassPoints::Four);
        assert_eq!(c[0].h_align, HAlign::Left);
        assert_eq!(c[0].offset.dx, Px(3.0));
        assert_eq!(c[1].h_align, HAlign::Right);
        assert_eq!(c[2].v_align, VAlign::Top);
        assert_eq!(c[2].offset.dy, Px(3.0));
        assert_eq!(c[3].v_align, VAlign::Bottom);
    }

    #[test]
    fn rim_alignment_faces_outwards() {
        let c = ellipse_rim_candidates(tp(0.0, 0.0), Px(10.0), Px(4.0), 0.0);
        assert_eq!((c[0].h_align, c[0].v_align), (HAlign::Centre, VAlign::Top));
        assert_eq!((c[1].h_align, c[1].v_align), (HAlign::Left, VAlign::Middle));
        assert_eq!((c[2].h_align, c[2].v_align), (HAlign::Centre, VAlign::Bottom));
        assert_eq!((c[3].h_align, c[3].v_align), (HAlign::Right, VAlign::Middle));
        assert!((c[0].offset.dy.0 - 10.0).abs() < 1e-12);
        assert!((c[1].offset.dx.0 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn type_offsets() {
        let canvas = CanvasTransform::new(1.0, CanvasLayout::default()).unwrap();
        let star = star_label_offset(Px(2.0), &canvas);
        let dso = dso_label_offset(Px(2.0), &canvas);
        assert!((star.0 - (2.0 + 0.075 * canvas.cm())).abs() < 1e-12);
        assert!((dso.0 - (2.0 + 0.08 * canvas.cm())).abs() < 1e-12);
    }
}
