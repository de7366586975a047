//! Per-frame input samples, and their translation into manual pivot rotations.

use bevy_ecs::prelude::*;
use bevy_math::{DQuat, DVec2, DVec3};
use bevy_reflect::prelude::*;

use super::{mode::Mode, snap::SnapView, trackball::trackball_point, trackball::RADIUS};
use crate::settings::CamSettings;

/// Degrees of rotation per unit of trackball travel, and per unit of pitch/yaw input.
const DEGREES_PER_UNIT: f64 = 60.0;

/// Everything the controller reads from the user in one frame.
///
/// Screen-space values are in logical pixels with the origin at the bottom left and y up.
#[derive(Debug, Clone, Default, PartialEq, Resource, Reflect)]
pub struct FrameInput {
    /// Size of the screen.
    pub screen_size: DVec2,
    /// Position of the pointer, if it is over the screen.
    pub pointer_position: Option<DVec2>,
    /// Pointer motion since last frame.
    pub pointer_delta: DVec2,
    /// The rotate button is held.
    pub rotate_held: bool,
    /// The pan button is held.
    pub pan_held: bool,
    /// The pan button was double-clicked this frame.
    pub pan_double_click: bool,
    /// Mouse wheel zoom this frame. Positive zooms in.
    pub wheel: f64,
    /// Zoom keys: +1 while zooming in, -1 while zooming out.
    pub zoom_keys: f64,
    /// Orbit keys: x is down minus up (pitch), y is left minus right (yaw).
    pub orbit_keys: DVec2,
    /// Analog pitch (x) and heading (y) axes.
    pub orbit_axes: DVec2,
    /// The modifier key is held.
    pub modifier: bool,
    /// A mode-select key was pressed this frame.
    pub mode_select: Option<Mode>,
    /// A snap key was pressed this frame.
    pub snap: Option<SnapView>,
    /// The toggle key was pressed this frame.
    pub toggle: bool,
    /// Real (unscaled) seconds since last frame.
    pub real_delta_secs: f64,
}

/// The one-frame rotation requested by a trackball drag, in world space.
///
/// The cursor is mapped onto the trackball as the drag's end point, and the same point pushed
/// ahead by this frame's pointer motion is the start point; the rotation turns the camera from
/// start to end, so the scene follows the cursor. The axis comes from the trackball geometry,
/// but the angle is proportional to the raw pointer motion to stay responsive at low speeds.
/// `view` is the world rotation of the camera whose view space the trackball lives in.
pub fn drag_rotation(input: &FrameInput, view: DQuat, settings: &CamSettings) -> Option<DQuat> {
    if !input.rotate_held {
        return None;
    }
    let size = input.screen_size.min_element() / 2.0;
    if !(size > 0.0) || !(settings.sphere_scale > 0.0) {
        return None;
    }
    let center = input.screen_size / 2.0;
    let cursor = input.pointer_position.unwrap_or(center);
    let end = (cursor - center) / (size * settings.sphere_scale);
    let delta = input.pointer_delta * settings.orbit_sensitivity;
    let start = end + delta / settings.sphere_scale;

    let axis = to_view_space(trackball_point(start)).cross(to_view_space(trackball_point(end)));
    let axis = (view * axis).try_normalize()?;
    let angle = (delta.length() / (2.0 * RADIUS) * DEGREES_PER_UNIT).to_radians();
    Some(DQuat::from_axis_angle(axis, angle))
}

/// The one-frame rotation requested by the pitch/yaw keys and axes, in world space.
///
/// The rate is scaled by real elapsed time so it does not depend on frame rate. Pitching down
/// swings the camera down around the pivot, yawing left swings it left.
pub fn key_rotation(input: &FrameInput, pivot: DQuat, settings: &CamSettings) -> Option<DQuat> {
    let mut py = (input.orbit_keys + input.orbit_axes) * input.real_delta_secs;
    if settings.invert_pitch {
        py.x = -py.x;
    }
    if settings.invert_yaw {
        py.y = -py.y;
    }
    py *= settings.key_sensitivity;
    if py == DVec2::ZERO || !py.is_finite() {
        return None;
    }
    let right = pivot * DVec3::X;
    let up = pivot * DVec3::Y;
    let axis = (right * py.x - up * py.y).try_normalize()?;
    let angle = (py.length() * DEGREES_PER_UNIT).to_radians();
    Some(DQuat::from_axis_angle(axis, angle))
}

/// The manual rotation for this frame. The key path is serviced last and wins if both fire.
///
/// Keys turn about the pivot's own axes. The drag axis is found in the rendering camera's view
/// space, so `view` is the camera's world rotation, including any pan offset.
pub fn manual_rotation(
    input: &FrameInput,
    pivot: DQuat,
    view: DQuat,
    settings: &CamSettings,
) -> Option<DQuat> {
    let drag = drag_rotation(input, view, settings);
    key_rotation(input, pivot, settings).or(drag)
}

/// Trackball points have the facing pole at -z with y up; the pivot's view space faces the
/// viewer along +z.
fn to_view_space(trackball: DVec3) -> DVec3 {
    DVec3::new(trackball.x, trackball.y, -trackball.z)
}
