//! The vessel camera controller.
//!
//! [`VesselCamPlugin`] wires the controller into an app. Each frame, in [`PostUpdate`]:
//!
//! 1. [`gather_frame_input`] snapshots raw input into [`inputs::FrameInput`].
//! 2. [`component::VesselCam::receive_lifecycle_events`] forwards vessel, sphere of influence and
//!    UI visibility changes.
//! 3. [`component::VesselCam::update_pivots`] runs the controller for every pivot.
//! 4. [`host::FollowCam::apply`] places the rendering cameras.
//!
//! All of this runs before transform propagation, so the new orientation is rendered the same
//! frame. The host must update [`reference::FlightKinematics`] before [`PostUpdate`].

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_transform::TransformSystem;

use crate::{
    events::{ConfigPanelToggled, SettingsChanged, SoiChanged, UiVisibility, VesselChanged},
    input::{gather_frame_input, CamBindings},
    vessel_state::VesselCamState,
};

pub mod component;
pub mod host;
pub mod inputs;
pub mod mode;
pub mod reference;
pub mod snap;
pub mod solver;
pub mod trackball;
pub mod tracker;
pub mod zoom;

/// Adds the vessel camera controller.
pub struct VesselCamPlugin;

impl Plugin for VesselCamPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<inputs::FrameInput>()
            .init_resource::<CamBindings>()
            .add_event::<VesselChanged>()
            .add_event::<SoiChanged>()
            .add_event::<UiVisibility>()
            .add_event::<ConfigPanelToggled>()
            .add_event::<SettingsChanged>()
            .add_systems(
                PostUpdate,
                (
                    gather_frame_input,
                    component::VesselCam::receive_lifecycle_events,
                    component::VesselCam::update_pivots,
                    host::FollowCam::apply,
                )
                    .chain()
                    .before(TransformSystem::TransformPropagate),
            )
            .register_type::<component::VesselCam>()
            .register_type::<host::FollowCam>()
            .register_type::<reference::FlightKinematics>()
            .register_type::<VesselCamState>()
            .register_type::<inputs::FrameInput>()
            .register_type::<CamBindings>();
    }
}
