//! Maps screen points onto a virtual trackball.

use bevy_math::{DVec2, DVec3};

/// Radius of the trackball sphere.
pub const RADIUS: f64 = 1.0;
/// Squared distance from center at which the sphere hands over to the cone (45 degrees).
const HANDOVER: f64 = RADIUS * RADIUS / 2.0;

/// Map a center-relative, aspect-adjusted screen point (roughly in -1..1) onto the trackball.
///
/// Points within 45 degrees of the pole facing the viewer land on the sphere. Further out they
/// land on a hyperbolic cone tangent to the sphere at the 45 degree latitude, so the surface
/// stays smooth and bounded however far the cursor strays. The facing pole is at `-z`.
pub fn trackball_point(xy: DVec2) -> DVec3 {
    let d = xy.length_squared();
    let z = if d < HANDOVER { sphere_z(d) } else { cone_z(d) };
    xy.extend(z)
}

fn sphere_z(d: f64) -> f64 {
    -(RADIUS * RADIUS - d).sqrt()
}

// Written as the root of `t^2 / d` rather than `t / sqrt(d)` so that both branches compute the
// square root of the same value at the handover.
fn cone_z(d: f64) -> f64 {
    -(HANDOVER * HANDOVER / d).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_facing_pole() {
        assert_eq!(trackball_point(DVec2::ZERO), DVec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn branches_agree_at_handover() {
        let d = 0.5;
        assert_eq!(sphere_z(d), cone_z(d));
        // x^2 + y^2 is exactly 0.5 here.
        let p = trackball_point(DVec2::new(0.5, 0.5));
        assert_eq!(p.z, sphere_z(0.5));
    }

    #[test]
    fn inner_points_lie_on_sphere() {
        let p = trackball_point(DVec2::new(0.3, -0.4));
        assert!((p.length() - RADIUS).abs() < 1e-12);
    }

    #[test]
    fn depth_stays_bounded_far_from_center() {
        for scale in [1.0, 10.0, 1e3, 1e6] {
            let p = trackball_point(DVec2::new(scale, -scale));
            assert!(p.is_finite());
            assert!(p.z < 0.0 && p.z >= -RADIUS);
        }
    }

    #[test]
    fn depth_is_monotonic_across_handover() {
        let mut last = trackball_point(DVec2::ZERO).z;
        for i in 1..200 {
            let r = i as f64 * 0.01;
            let z = trackball_point(DVec2::new(r, 0.0)).z;
            assert!(z >= last, "z decreased at r={r}");
            last = z;
        }
    }
}
