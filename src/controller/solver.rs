//! Minimal-angle rotation between two vectors.

use std::f64::consts::PI;

use bevy_math::{DQuat, DVec3};

/// Returns the smallest rotation that turns `a` onto the direction of `b`.
///
/// Uses the half-way vector `w = |b|a + |a|b` so no trigonometry is needed: the vector part is
/// `a × b / |w|` and the scalar part is `|w| / (2|a||b|)`. The result does not depend on the
/// magnitudes of the inputs.
///
/// When `a` and `b` point in exactly opposite directions `w` vanishes, and the rotation is a half
/// turn about an arbitrary axis perpendicular to `a`. Zero-length inputs give the identity.
pub fn rotation_between(a: DVec3, b: DVec3) -> DQuat {
    rotation_between_about(a, b, a.any_orthonormal_vector())
}

/// Like [`rotation_between`], but opposite inputs are resolved with a half turn about
/// `fallback_axis`, which should be perpendicular to `a`.
pub fn rotation_between_about(a: DVec3, b: DVec3, fallback_axis: DVec3) -> DQuat {
    let ma = a.length();
    let mb = b.length();
    if !(ma > 0.0 && mb > 0.0) || !ma.is_finite() || !mb.is_finite() {
        return DQuat::IDENTITY;
    }
    let w = mb * a + ma * b;
    let mw = w.length();
    if mw <= ANTIPARALLEL_EPSILON * ma * mb {
        let axis = fallback_axis
            .try_normalize()
            .unwrap_or_else(|| a.any_orthonormal_vector());
        return DQuat::from_axis_angle(axis, PI);
    }
    let v = a.cross(b) / mw;
    let s = mw / (2.0 * ma * mb);
    DQuat::from_xyzw(v.x, v.y, v.z, s).normalize()
}

/// Relative size of the half-way vector below which the inputs count as opposite.
const ANTIPARALLEL_EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn rotates_a_onto_b() {
        let cases = [
            (DVec3::X, DVec3::Y),
            (DVec3::new(1.0, 2.0, 3.0), DVec3::new(-3.0, 0.5, 1.0)),
            (DVec3::Z, DVec3::new(0.0, 1.0, -0.999)),
            (DVec3::new(0.3, -0.2, 0.9), DVec3::new(0.31, -0.2, 0.9)),
        ];
        for (a, b) in cases {
            let q = rotation_between(a, b);
            let rotated = (q * a).normalize();
            assert!(
                rotated.abs_diff_eq(b.normalize(), TOL),
                "{a} -> {b} gave {rotated}"
            );
        }
    }

    #[test]
    fn same_direction_is_identity() {
        let a = DVec3::new(0.2, -4.0, 1.5);
        let q = rotation_between(a, a);
        assert!(q.abs_diff_eq(DQuat::IDENTITY, TOL));
        let q = rotation_between(a, a * 7.0);
        assert!(q.abs_diff_eq(DQuat::IDENTITY, TOL));
    }

    #[test]
    fn independent_of_magnitude() {
        let a = DVec3::new(1.0, 0.5, -0.25);
        let b = DVec3::new(-0.4, 1.0, 0.9);
        let q1 = rotation_between(a, b);
        let q2 = rotation_between(a * 1e4, b * 3e-3);
        assert!(q1.abs_diff_eq(q2, TOL));
    }

    #[test]
    fn result_is_minimal_angle() {
        let a = DVec3::X;
        let b = DVec3::new(1.0, 1.0, 0.0);
        let (axis, angle) = rotation_between(a, b).to_axis_angle();
        assert!((angle - PI / 4.0).abs() < TOL);
        assert!(axis.abs_diff_eq(DVec3::Z, TOL));
    }

    #[test]
    fn opposite_vectors_give_half_turn() {
        let a = DVec3::new(0.0, 2.0, 0.0);
        let q = rotation_between(a, -a);
        assert!(q.is_finite());
        assert!((q * a).abs_diff_eq(-a, TOL));
    }

    #[test]
    fn opposite_vectors_use_fallback_axis() {
        let q = rotation_between_about(DVec3::X, DVec3::NEG_X, DVec3::Z * 3.0);
        assert!((q * DVec3::Z).abs_diff_eq(DVec3::Z, TOL));
        assert!((q * DVec3::X).abs_diff_eq(DVec3::NEG_X, TOL));
    }

    #[test]
    fn zero_vector_gives_identity() {
        assert_eq!(rotation_between(DVec3::ZERO, DVec3::X), DQuat::IDENTITY);
        assert_eq!(rotation_between(DVec3::Y, DVec3::ZERO), DQuat::IDENTITY);
    }
}
