//! Dolly zoom, field of view zoom, and the pan offset.

use bevy_math::prelude::*;

use super::{host::HostCamera, inputs::FrameInput};
use crate::settings::CamSettings;

/// Degrees of field of view per unit of zoom input.
const FOV_PER_ZOOM: f32 = 5.0;
/// The pan offset may not exceed this fraction of the field of view.
const PAN_LIMIT_FRACTION: f32 = 0.6;
/// Pan offset per unit of orbit sensitivity.
const PAN_SCALE: f64 = 0.5;

/// Apply a zoom step. With the modifier held this widens the field of view by `amount`
/// (clamped to the host's limits); otherwise the dolly distance is scaled by `1 - amount`.
pub fn zoom(host: &mut impl HostCamera, amount: f32, modifier: bool) {
    if amount == 0.0 || !amount.is_finite() {
        return;
    }
    if modifier {
        let fov = host.fov_limits().clamp(host.fov() + amount * FOV_PER_ZOOM);
        host.set_fov(fov);
    } else {
        host.set_distance((1.0 - amount) * host.distance());
    }
}

/// Service the wheel and zoom keys for one frame.
pub fn zoom_from_input(host: &mut impl HostCamera, input: &FrameInput) {
    zoom(host, input.wheel as f32, input.modifier);
    let keys = (input.zoom_keys * input.real_delta_secs) as f32;
    zoom(host, keys, input.modifier);
}

/// Service the pan button for one frame: drag to offset heading and pitch, double-click to reset
/// the offset and restore the default field of view. The offset is always kept within
/// `±0.6 × fov` radians.
pub fn pan_from_input(host: &mut impl HostCamera, input: &FrameInput, settings: &CamSettings) {
    let mut offset = host.pan_offset();
    if input.pan_held {
        let mut scale = settings.orbit_sensitivity * PAN_SCALE;
        if settings.invert_offset {
            scale = -scale;
        }
        offset.x -= (input.pointer_delta.x * scale) as f32;
        offset.y += (input.pointer_delta.y * scale) as f32;
    }
    if input.pan_double_click {
        offset = Vec2::ZERO;
        host.set_fov(settings.default_fov);
    }
    let limit = host.fov().to_radians() * PAN_LIMIT_FRACTION;
    offset = offset.clamp(Vec2::splat(-limit), Vec2::splat(limit));
    if offset != host.pan_offset() {
        host.set_pan_offset(offset);
    }
}
