//! Affine transform primitives for footprint geometry.
//!
//! All geometry lives in a y-down board frame, expressed in millimeters.
//! Transforms are 3x3 matrices with an implicit `0 0 1` bottom row, composed
//! as `parent * local` and applied to points via [`apply`].

use glam::{DMat3, DVec2, dvec2, dvec3};

/// Translation by `v`.
pub fn translation(v: DVec2) -> DMat3 {
    DMat3::from_translation(v)
}

/// Rotation by `degrees`, clockwise in the y-down board frame.
///
/// A 90 degree rotation maps `(1, 0)` to `(0, -1)`.
pub fn rotation(degrees: f64) -> DMat3 {
    // glam's from_angle is counterclockwise in a y-up frame; the board frame
    // flips the sign.
    DMat3::from_angle(-degrees.to_radians())
}

/// Per-axis scale. Uniform scale is `scaling(DVec2::splat(s))`.
pub fn scaling(v: DVec2) -> DMat3 {
    DMat3::from_scale(v)
}

/// Reflection that flips geometry along `axis` (OpenSCAD convention: the
/// argument is the normal of the mirror line, so `mirroring(dvec2(1.0, 0.0))`
/// negates x).
pub fn mirroring(axis: DVec2) -> DMat3 {
    let n = dvec2(axis.x, -axis.y).normalize();
    DMat3::from_cols(
        dvec3(1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, 0.0),
        dvec3(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, 0.0),
        dvec3(0.0, 0.0, 1.0),
    )
}

/// Transform a single point.
pub fn apply(m: &DMat3, p: DVec2) -> DVec2 {
    m.transform_point2(p)
}

/// Transform a point list, preserving order.
pub fn apply_all(m: &DMat3, points: &[DVec2]) -> Vec<DVec2> {
    points.iter().map(|p| m.transform_point2(*p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn rotation_is_clockwise() {
        let m = rotation(90.0);
        assert!(close(apply(&m, dvec2(1.0, 0.0)), dvec2(0.0, -1.0)));
        assert!(close(apply(&m, dvec2(0.0, 1.0)), dvec2(1.0, 0.0)));
    }

    #[test]
    fn rotation_composes_to_identity() {
        let m = rotation(37.5) * rotation(-37.5);
        assert!(m.abs_diff_eq(DMat3::IDENTITY, EPS));
    }

    #[test]
    fn translation_offsets() {
        let m = translation(dvec2(3.0, -2.0));
        assert!(close(apply(&m, dvec2(1.0, 1.0)), dvec2(4.0, -1.0)));
    }

    #[test]
    fn scaling_is_per_axis() {
        let m = scaling(dvec2(2.0, 3.0));
        assert!(close(apply(&m, dvec2(1.0, 1.0)), dvec2(2.0, 3.0)));
    }

    #[test]
    fn mirroring_flips_named_axis() {
        assert!(close(
            apply(&mirroring(dvec2(1.0, 0.0)), dvec2(3.0, 2.0)),
            dvec2(-3.0, 2.0)
        ));
        assert!(close(
            apply(&mirroring(dvec2(0.0, 1.0)), dvec2(3.0, 2.0)),
            dvec2(3.0, -2.0)
        ));
    }

    #[test]
    fn mirroring_normalizes_its_axis() {
        let a = mirroring(dvec2(1.0, 0.0));
        let b = mirroring(dvec2(42.0, 0.0));
        assert!(a.abs_diff_eq(b, EPS));
    }

    #[test]
    fn transforms_accumulate_left_to_right() {
        // Rotate a translated point: the local frame is applied first.
        let m = rotation(90.0) * translation(dvec2(1.0, 0.0));
        assert!(close(apply(&m, DVec2::ZERO), dvec2(0.0, -1.0)));
    }
}
