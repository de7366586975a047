//! Holds the camera still relative to a rotating pair of reference vectors.
//!
//! The reference vectors are captured in the pivot's local space. Each frame they are carried
//! back into world space with the current pivot rotation, and the pivot is turned by whatever
//! rotation re-aligns them with the freshly resolved world vectors: first the primary, then,
//! on top of that, the secondary. Aligning two independent directions pins roll as well as
//! heading and pitch.

use bevy_math::{DQuat, DVec3};
use bevy_reflect::prelude::*;

use super::{
    mode::SecondaryAxis,
    reference::ReferenceVectors,
    solver::{rotation_between, rotation_between_about},
};

/// The captured baseline and the flags that decide when to recapture it.
#[derive(Debug, Clone, Reflect)]
pub struct FrameTracker {
    primary_reference: DVec3,
    secondary_reference: DVec3,
    secondary_axis: SecondaryAxis,
    recapture: bool,
    recapture_secondary: bool,
}

impl Default for FrameTracker {
    fn default() -> Self {
        Self {
            primary_reference: DVec3::NEG_Z,
            secondary_reference: DVec3::Y,
            secondary_axis: SecondaryAxis::None,
            recapture: true,
            recapture_secondary: false,
        }
    }
}

impl FrameTracker {
    /// Capture both references from the pivot on the next [`FrameTracker::recapture_if_flagged`].
    pub fn request_recapture(&mut self) {
        self.recapture = true;
    }

    /// Is a full recapture pending?
    pub fn recapture_pending(&self) -> bool {
        self.recapture
    }

    /// The secondary axis seen last frame.
    pub fn secondary_axis(&self) -> SecondaryAxis {
        self.secondary_axis
    }

    /// The captured references in pivot-local space, primary first.
    pub fn references(&self) -> (DVec3, DVec3) {
        (self.primary_reference, self.secondary_reference)
    }

    /// Note the secondary axis resolved this frame. A different axis than last frame means the
    /// secondary baseline no longer refers to the same direction and must be recaptured.
    pub fn observe_axis(&mut self, axis: SecondaryAxis) {
        if axis != self.secondary_axis {
            self.secondary_axis = axis;
            self.recapture_secondary = true;
        }
    }

    /// Capture whatever is flagged. Returns true if anything was captured.
    pub fn recapture_if_flagged(&mut self, pivot: DQuat, refs: &ReferenceVectors) -> bool {
        let captured = self.recapture || self.recapture_secondary;
        if self.recapture {
            self.capture(pivot, refs);
        } else if self.recapture_secondary {
            self.secondary_reference = pivot.inverse() * refs.secondary;
            self.recapture_secondary = false;
        }
        captured
    }

    /// Capture both references from the pivot, clearing pending flags.
    pub fn capture(&mut self, pivot: DQuat, refs: &ReferenceVectors) {
        let inverse = pivot.inverse();
        self.primary_reference = inverse * refs.primary;
        self.secondary_reference = inverse * refs.secondary;
        self.recapture = false;
        self.recapture_secondary = false;
    }

    /// The world rotation that, applied to `pivot`, re-aligns the captured references with
    /// `refs`.
    pub fn replay(&self, pivot: DQuat, refs: &ReferenceVectors) -> DQuat {
        let primary = pivot * self.primary_reference;
        let rotation = rotation_between(primary, refs.primary);
        let secondary = rotation * (pivot * self.secondary_reference);
        // Both secondaries are orthogonal to the primary, so a half turn between them is about
        // the primary.
        rotation_between_about(secondary, refs.secondary, refs.primary) * rotation
    }

    /// Rewrite the baseline so the next replay brings the pivot from `pivot` to `target`.
    pub fn rebase(&mut self, pivot: DQuat, target: DQuat) {
        let shift = target.inverse() * pivot;
        self.primary_reference = shift * self.primary_reference;
        self.secondary_reference = shift * self.secondary_reference;
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::controller::reference::reject;

    /// Two unit quaternions describe the same rotation when they agree up to sign.
    fn same_rotation(a: DQuat, b: DQuat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-12
    }

    fn refs(primary: DVec3, secondary: DVec3) -> ReferenceVectors {
        ReferenceVectors {
            primary,
            secondary,
            secondary_axis: SecondaryAxis::Velocity,
            auto_rotate: true,
        }
    }

    fn pivot() -> DQuat {
        DQuat::from_euler(bevy_math::EulerRot::YXZ, 0.4, -0.3, 0.1)
    }

    #[test]
    fn static_frame_is_idempotent() {
        let mut tracker = FrameTracker::default();
        let r = refs(DVec3::new(0.0, -1.0, 0.2), DVec3::new(1.0, 0.0, 0.0));
        let mut pivot = pivot();
        tracker.capture(pivot, &r);
        for _ in 0..10 {
            let next = tracker.replay(pivot, &r) * pivot;
            assert!(next.abs_diff_eq(pivot, 1e-12));
            pivot = next;
        }
    }

    #[test]
    fn follows_rotating_frame() {
        let mut tracker = FrameTracker::default();
        let r0 = refs(DVec3::NEG_Y, DVec3::X);
        let pivot0 = pivot();
        tracker.capture(pivot0, &r0);

        let turn = DQuat::from_rotation_z(FRAC_PI_2 / 3.0) * DQuat::from_rotation_y(0.2);
        let r1 = refs(turn * r0.primary, turn * r0.secondary);
        let pivot1 = tracker.replay(pivot0, &r1) * pivot0;
        assert!(same_rotation(pivot1, turn * pivot0));
    }

    #[test]
    fn axis_change_recaptures_secondary_only() {
        let mut tracker = FrameTracker::default();
        let pivot = pivot();
        let r = refs(DVec3::NEG_Y, DVec3::X);
        tracker.capture(pivot, &r);
        tracker.observe_axis(SecondaryAxis::Velocity);
        let (primary_before, _) = tracker.references();

        let mut r2 = refs(DVec3::NEG_Y, DVec3::Z);
        r2.secondary_axis = SecondaryAxis::WorldZ;
        tracker.observe_axis(r2.secondary_axis);
        assert!(tracker.recapture_if_flagged(pivot, &r2));
        let (primary_after, secondary_after) = tracker.references();
        assert_eq!(primary_before, primary_after);
        assert!((pivot * secondary_after).abs_diff_eq(DVec3::Z, 1e-12));
        assert!(tracker.replay(pivot, &r2).abs_diff_eq(DQuat::IDENTITY, 1e-12));
    }

    #[test]
    fn rebase_lands_on_target() {
        let mut tracker = FrameTracker::default();
        let pivot = pivot();
        let r = refs(DVec3::new(0.2, -1.0, 0.0), DVec3::new(1.0, 0.2, 0.3));
        let r = refs(r.primary, reject(r.secondary, r.primary));
        tracker.capture(pivot, &r);
        let target = DQuat::from_rotation_x(1.0) * DQuat::from_rotation_z(-0.5);
        tracker.rebase(pivot, target);
        let next = tracker.replay(pivot, &r) * pivot;
        assert!(same_rotation(next, target));
    }

    #[test]
    fn opposite_secondary_turns_about_primary() {
        let mut tracker = FrameTracker::default();
        let pivot = DQuat::IDENTITY;
        tracker.capture(pivot, &refs(DVec3::NEG_Y, DVec3::X));
        let rotation = tracker.replay(pivot, &refs(DVec3::NEG_Y, DVec3::NEG_X));
        assert!((rotation * DVec3::NEG_Y).abs_diff_eq(DVec3::NEG_Y, 1e-9));
        assert!((rotation * DVec3::X).abs_diff_eq(DVec3::NEG_X, 1e-9));
    }
}
