//! Snapping the view to fixed orientations relative to the active reference frame.

use std::f64::consts::PI;

use bevy_math::{DMat3, DQuat, DVec3};
use bevy_reflect::prelude::*;

/// A snap key. Each has a reversed variant, selected by holding the modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SnapView {
    /// Look along the primary reference with the secondary up. Reversed: look away from it.
    Primary,
    /// Look along the secondary reference with the primary down. Reversed: look back along it.
    Secondary,
    /// Look across both references with the primary down. Reversed: the other side.
    Lateral,
    /// Turn half way around the pivot's right axis. Reversed: around its up axis.
    Flip,
    /// Recall the saved view for the current mode. Reversed: save the current view instead.
    Home,
}

/// What a snap key asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapAction {
    /// Move the pivot to this world rotation.
    Target(DQuat),
    /// Store this frame-relative rotation as the mode's saved view.
    Save(DQuat),
}

/// The rotation whose local -Z points along `forward` and whose local +Y is as close to `up` as
/// possible. Matches Bevy's `Transform::looking_to`.
pub fn look_rotation(forward: DVec3, up: DVec3) -> DQuat {
    let Some(back) = (-forward).try_normalize() else {
        return DQuat::IDENTITY;
    };
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| back.any_orthonormal_vector());
    let up = back.cross(right);
    DQuat::from_mat3(&DMat3::from_cols(right, up, back)).normalize()
}

impl SnapView {
    /// Resolve the snap against `frame`, the world rotation of the active reference frame, for a
    /// pivot currently at `pivot`. `saved` is the current mode's saved view.
    pub fn action(self, reversed: bool, frame: DQuat, pivot: DQuat, saved: DQuat) -> SnapAction {
        let offset = |look: DVec3, up: DVec3| frame * look_rotation(look, up);
        let target = match (self, reversed) {
            (SnapView::Primary, false) => frame,
            (SnapView::Primary, true) => offset(DVec3::Z, DVec3::NEG_Y),
            (SnapView::Secondary, false) => offset(DVec3::Y, DVec3::Z),
            (SnapView::Secondary, true) => offset(DVec3::NEG_Y, DVec3::Z),
            (SnapView::Lateral, false) => offset(DVec3::X, DVec3::Z),
            (SnapView::Lateral, true) => offset(DVec3::NEG_X, DVec3::Z),
            (SnapView::Flip, reversed) => {
                let axis = if reversed { DVec3::Y } else { DVec3::X };
                DQuat::from_axis_angle(pivot * axis, PI) * pivot
            }
            (SnapView::Home, false) => frame * saved,
            (SnapView::Home, true) => return SnapAction::Save(frame.inverse() * pivot),
        };
        SnapAction::Target(target.normalize())
    }
}
