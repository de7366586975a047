//! A follow camera for vessels moving through rotating reference frames.
//!
//! The camera orbits a pivot that tracks the active vessel. Instead of holding a fixed world
//! orientation, the pivot holds still relative to a pair of reference directions, such as the
//! direction to the body being orbited and the vessel's velocity, so the view stays put as the
//! vessel travels around a planet. The user can rotate the view with a trackball drag or the
//! pitch/yaw keys at any time, and the new orientation becomes the one that is held.
//!
//! ## Usage
//!
//! Add [`VesselCamPlugin`](crate::controller::VesselCamPlugin), then spawn a pivot with a
//! [`VesselCam`](crate::controller::component::VesselCam) and
//! [`FlightKinematics`](crate::controller::reference::FlightKinematics), and a child camera with
//! a [`FollowCam`](crate::controller::host::FollowCam). Update the kinematics each frame before
//! [`PostUpdate`](bevy_app::PostUpdate).
//!
//! ## Modes
//!
//! - Free: the central body is down, surface velocity is the second reference.
//! - Orbital: the orbital velocity is forward, a world axis is the second reference.
//! - Chase: like free, but the target direction replaces surface velocity when there is one.
//! - Locked: the camera turns with the vessel.
//! - Auto: one of the above, chosen by the host for each vessel.
//!
//! When the second reference is too close to the first to pin roll, the world axis most
//! orthogonal to the first is used instead ("frame lock").

pub mod controller;
pub mod error;
pub mod events;
pub mod input;
pub mod settings;
pub mod vessel_state;

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            component::{FrameReport, PivotUpdate, VesselCam},
            host::{FollowCam, FovLimits, HostCamera},
            inputs::FrameInput,
            mode::{Mode, SecondaryAxis},
            reference::FlightKinematics,
            snap::SnapView,
            VesselCamPlugin,
        },
        error::CamError,
        events::*,
        input::CamBindings,
        settings::CamSettings,
        vessel_state::VesselCamState,
    };
}
