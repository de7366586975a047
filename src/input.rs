//! Turns Bevy's raw keyboard, mouse and gamepad state into a [`FrameInput`] snapshot.
//!
//! The controller only ever reads [`FrameInput`], so a host with its own input layer can skip
//! [`gather_frame_input`] and fill the resource itself.

use bevy_ecs::prelude::*;
use bevy_input::{
    gamepad::Gamepad,
    mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
};
use bevy_math::DVec2;
use bevy_reflect::prelude::*;
use bevy_time::{Real, Time};
use bevy_window::{PrimaryWindow, Window};

use crate::controller::{inputs::FrameInput, mode::Mode, snap::SnapView};

/// Two presses of the pan button within this many seconds reset the pan offset.
pub const DOUBLE_CLICK_WINDOW: f64 = 0.3;
/// Zoom amount per line of mouse wheel travel.
pub const WHEEL_STEP: f64 = 0.1;
/// Pixel-precise scroll deltas are converted to lines at this rate.
const PIXELS_PER_LINE: f64 = 100.0;

/// Key and button assignments.
#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct CamBindings {
    /// Held to rotate the view with the pointer.
    pub rotate: MouseButton,
    /// Held to pan the view with the pointer. Double click to reset.
    pub pan: MouseButton,
    /// Modifier for the snap and toggle keys, and for zooming the field of view.
    pub modifier: KeyCode,
    /// Opens the configuration panel, or with the modifier, disables the current mode.
    pub toggle: KeyCode,
    /// Mode selection keys.
    pub modes: [(KeyCode, Mode); 5],
    /// Snap view keys.
    pub snaps: [(KeyCode, SnapView); 5],
    /// Zoom in, zoom out.
    pub zoom: [KeyCode; 2],
    /// Pitch up, pitch down, yaw left, yaw right.
    pub orbit: [KeyCode; 4],
}

impl Default for CamBindings {
    fn default() -> Self {
        Self {
            rotate: MouseButton::Right,
            pan: MouseButton::Middle,
            modifier: KeyCode::ControlRight,
            toggle: KeyCode::NumpadDivide,
            modes: [
                (KeyCode::Numpad2, Mode::Auto),
                (KeyCode::Numpad4, Mode::Locked),
                (KeyCode::Numpad5, Mode::Chase),
                (KeyCode::Numpad6, Mode::Free),
                (KeyCode::Numpad8, Mode::Orbital),
            ],
            snaps: [
                (KeyCode::Numpad7, SnapView::Primary),
                (KeyCode::Numpad1, SnapView::Secondary),
                (KeyCode::Numpad3, SnapView::Lateral),
                (KeyCode::Numpad9, SnapView::Flip),
                (KeyCode::Numpad0, SnapView::Home),
            ],
            zoom: [KeyCode::NumpadAdd, KeyCode::NumpadSubtract],
            orbit: [
                KeyCode::ArrowUp,
                KeyCode::ArrowDown,
                KeyCode::ArrowLeft,
                KeyCode::ArrowRight,
            ],
        }
    }
}

/// Snapshot this frame's input into the [`FrameInput`] resource.
///
/// Window coordinates are flipped so the origin is the bottom left corner with y up, and pointer
/// motion is flipped to match.
#[allow(clippy::too_many_arguments)]
pub fn gather_frame_input(
    bindings: Res<CamBindings>,
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    windows: Query<&Window, With<PrimaryWindow>>,
    gamepads: Query<&Gamepad>,
    time: Res<Time<Real>>,
    mut last_pan_press: Local<Option<f64>>,
    mut input: ResMut<FrameInput>,
) {
    let (screen_size, pointer_position) = match windows.single() {
        Ok(window) => {
            let size = DVec2::new(window.width() as f64, window.height() as f64);
            let pointer = window
                .cursor_position()
                .map(|p| DVec2::new(p.x as f64, size.y - p.y as f64));
            (size, pointer)
        }
        Err(_) => (DVec2::ZERO, None),
    };

    let mut pan_double_click = false;
    if buttons.just_pressed(bindings.pan) {
        let now = time.elapsed_secs_f64();
        match *last_pan_press {
            Some(last) if now - last <= DOUBLE_CLICK_WINDOW => {
                pan_double_click = true;
                *last_pan_press = None;
            }
            _ => *last_pan_press = Some(now),
        }
    }

    let lines = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y as f64,
        MouseScrollUnit::Pixel => scroll.delta.y as f64 / PIXELS_PER_LINE,
    };

    let axis = |positive: KeyCode, negative: KeyCode| {
        keys.pressed(positive) as u8 as f64 - keys.pressed(negative) as u8 as f64
    };
    let [pitch_up, pitch_down, yaw_left, yaw_right] = bindings.orbit;
    let orbit_keys = DVec2::new(axis(pitch_down, pitch_up), axis(yaw_left, yaw_right));
    let orbit_axes = gamepads
        .iter()
        .map(|gamepad| {
            let stick = gamepad.right_stick();
            DVec2::new(-stick.y as f64, -stick.x as f64)
        })
        .sum();

    let next = FrameInput {
        screen_size,
        pointer_position,
        pointer_delta: DVec2::new(motion.delta.x as f64, -motion.delta.y as f64),
        rotate_held: buttons.pressed(bindings.rotate),
        pan_held: buttons.pressed(bindings.pan),
        pan_double_click,
        wheel: lines * WHEEL_STEP,
        zoom_keys: axis(bindings.zoom[0], bindings.zoom[1]),
        orbit_keys,
        orbit_axes,
        modifier: keys.pressed(bindings.modifier),
        mode_select: bindings
            .modes
            .iter()
            .find(|(key, _)| keys.just_pressed(*key))
            .map(|&(_, mode)| mode),
        snap: bindings
            .snaps
            .iter()
            .find(|(key, _)| keys.just_pressed(*key))
            .map(|&(_, view)| view),
        toggle: keys.just_pressed(bindings.toggle),
        real_delta_secs: time.delta_secs_f64(),
    };
    input.set_if_neq(next);
}
