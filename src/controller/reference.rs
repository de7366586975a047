//! Resolves the world-space reference vectors the camera holds still against.

use bevy_ecs::prelude::*;
use bevy_math::{DQuat, DVec3};
use bevy_reflect::prelude::*;

use super::mode::{Mode, SecondaryAxis};

/// Kinematics of the vessel the camera follows, supplied by the host every frame before the
/// camera updates.
#[derive(Debug, Clone, Component, Reflect)]
pub struct FlightKinematics {
    /// The vessel entity. A change of vessel switches the camera's target.
    pub vessel: Entity,
    /// World rotation of the vessel.
    pub vessel_rotation: DQuat,
    /// Direction from the vessel to the central body it orbits, if there is one.
    pub body_direction: Option<DVec3>,
    /// Orbital velocity.
    pub orbital_velocity: DVec3,
    /// Velocity relative to the central body's surface.
    pub surface_velocity: DVec3,
    /// Direction from the vessel to its target, if a target is set.
    pub target_direction: Option<DVec3>,
    /// The host's classification of this vessel, used to resolve [`Mode::Auto`] and the primary
    /// reference of [`Mode::Chase`].
    pub auto_mode: Mode,
}

impl FlightKinematics {
    /// Kinematics for a vessel at rest, with no central body.
    pub fn new(vessel: Entity) -> Self {
        Self {
            vessel,
            vessel_rotation: DQuat::IDENTITY,
            body_direction: None,
            orbital_velocity: DVec3::ZERO,
            surface_velocity: DVec3::ZERO,
            target_direction: None,
            auto_mode: Mode::Free,
        }
    }
}

/// The reference vectors resolved for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ReferenceVectors {
    /// Primary reference direction, world space.
    pub primary: DVec3,
    /// Secondary reference direction, world space, orthogonal to `primary`.
    pub secondary: DVec3,
    /// What `secondary` is.
    pub secondary_axis: SecondaryAxis,
    /// Whether the pivot should be rotated to follow the vectors. False in locked mode.
    pub auto_rotate: bool,
}

impl Default for ReferenceVectors {
    fn default() -> Self {
        Self {
            primary: DVec3::NEG_Z,
            secondary: DVec3::Y,
            secondary_axis: SecondaryAxis::None,
            auto_rotate: false,
        }
    }
}

impl ReferenceVectors {
    /// Resolve the reference vectors for the selected `mode`.
    ///
    /// `frame_lock_epsilon` is the squared length at or below which the natural secondary
    /// vector, once made orthogonal to the primary, is considered degenerate and a world axis is
    /// used instead.
    ///
    /// Returns `None` when there is no central body or the primary vector has no direction.
    pub fn resolve(
        mode: Mode,
        kinematics: &FlightKinematics,
        frame_lock_epsilon: f64,
    ) -> Option<Self> {
        let body_direction = kinematics.body_direction?;

        let (primary_mode, secondary_mode) = match mode {
            Mode::Auto => {
                let resolved = mode.resolve_auto(kinematics.auto_mode);
                (resolved, resolved)
            }
            Mode::Chase => (Mode::Auto.resolve_auto(kinematics.auto_mode), Mode::Chase),
            other => (other, other),
        };

        let mut frame_lock = false;
        let primary = match primary_mode {
            Mode::Free | Mode::Chase | Mode::Auto => body_direction,
            Mode::Orbital => {
                frame_lock = true;
                kinematics.orbital_velocity
            }
            Mode::Locked => {
                let rotation = kinematics.vessel_rotation;
                return Some(Self {
                    primary: rotation * DVec3::NEG_Z,
                    secondary: rotation * DVec3::Y,
                    secondary_axis: SecondaryAxis::None,
                    auto_rotate: false,
                });
            }
        };
        if !(primary.length_squared() > 0.0) || !primary.is_finite() {
            return None;
        }

        let mut secondary = DVec3::ZERO;
        let mut secondary_axis = SecondaryAxis::None;
        if matches!(secondary_mode, Mode::Free | Mode::Chase) {
            let natural = match (secondary_mode, kinematics.target_direction) {
                (Mode::Chase, Some(target)) => target,
                _ => kinematics.surface_velocity,
            };
            secondary = reject(natural, primary);
            secondary_axis = SecondaryAxis::Velocity;
            frame_lock = !(secondary.length_squared() > frame_lock_epsilon);
        }
        if frame_lock {
            let (axis, tag) = most_orthogonal_axis(primary);
            secondary = reject(axis, primary);
            secondary_axis = tag;
        }

        Some(Self {
            primary,
            secondary,
            secondary_axis,
            auto_rotate: true,
        })
    }
}

/// The component of `v` orthogonal to `normal`.
pub fn reject(v: DVec3, normal: DVec3) -> DVec3 {
    v - v.dot(normal) / normal.length_squared() * normal
}

/// The world basis axis with the smallest absolute dot product with `primary`. Ties go to the
/// earlier axis in X, Y, Z order.
pub fn most_orthogonal_axis(primary: DVec3) -> (DVec3, SecondaryAxis) {
    let x = primary.dot(DVec3::X).abs();
    let y = primary.dot(DVec3::Y).abs();
    let z = primary.dot(DVec3::Z).abs();
    if x <= y && x <= z {
        (DVec3::X, SecondaryAxis::WorldX)
    } else if y <= z {
        (DVec3::Y, SecondaryAxis::WorldY)
    } else {
        (DVec3::Z, SecondaryAxis::WorldZ)
    }
}
