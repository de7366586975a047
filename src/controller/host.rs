//! The host camera the controller drives: dolly distance, field of view and pan offset.

use bevy_ecs::prelude::*;
use bevy_math::{prelude::*, DQuat, EulerRot};
use bevy_reflect::prelude::*;
use bevy_render::prelude::*;
use bevy_transform::prelude::*;

/// What the controller needs from the camera that renders the view.
///
/// The controller only owns the pivot's orientation. The rendering camera sits `distance` behind
/// the pivot and is aimed with a small heading/pitch pan offset; both are the host's to apply.
pub trait HostCamera {
    /// Dolly distance from the pivot.
    fn distance(&self) -> f32;
    /// Set the dolly distance. The host may clamp it.
    fn set_distance(&mut self, distance: f32);
    /// Vertical field of view, in degrees.
    fn fov(&self) -> f32;
    /// Set the vertical field of view, in degrees.
    fn set_fov(&mut self, fov: f32);
    /// Allowed field of view range, in degrees.
    fn fov_limits(&self) -> FovLimits;
    /// Heading (x) and pitch (y) pan offset, in radians.
    fn pan_offset(&self) -> Vec2;
    /// Set the heading (x) and pitch (y) pan offset, in radians.
    fn set_pan_offset(&mut self, offset: Vec2);
}

/// Bounds of the field of view, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FovLimits {
    /// Narrowest field of view.
    pub min: f32,
    /// Widest field of view.
    pub max: f32,
}

impl Default for FovLimits {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 120.0,
        }
    }
}

impl FovLimits {
    /// Clamp `fov` into range.
    pub fn clamp(&self, fov: f32) -> f32 {
        fov.clamp(self.min, self.max)
    }
}

/// [`HostCamera`] for a Bevy camera parented to the pivot entity.
///
/// Put this on the entity with the [`Camera`] and [`Projection`]; [`FollowCam::apply`] writes the
/// camera's local transform and perspective field of view from it every frame.
#[derive(Debug, Clone, Component, Reflect)]
pub struct FollowCam {
    /// Dolly distance from the pivot.
    pub distance: f32,
    /// Closest allowed dolly distance.
    pub min_distance: f32,
    /// Farthest allowed dolly distance.
    pub max_distance: f32,
    /// Vertical field of view, in degrees.
    pub fov: f32,
    /// Allowed field of view range.
    pub fov_limits: FovLimits,
    /// Heading (x) and pitch (y) pan offset, in radians.
    pub pan_offset: Vec2,
}

impl Default for FollowCam {
    fn default() -> Self {
        Self {
            distance: 30.0,
            min_distance: 1.0,
            max_distance: 150_000.0,
            fov: 60.0,
            fov_limits: FovLimits::default(),
            pan_offset: Vec2::ZERO,
        }
    }
}

impl HostCamera for FollowCam {
    fn distance(&self) -> f32 {
        self.distance
    }

    fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.distance = distance.clamp(self.min_distance, self.max_distance);
        }
    }

    fn fov(&self) -> f32 {
        self.fov
    }

    fn set_fov(&mut self, fov: f32) {
        if fov.is_finite() {
            self.fov = self.fov_limits.clamp(fov);
        }
    }

    fn fov_limits(&self) -> FovLimits {
        self.fov_limits
    }

    fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    fn set_pan_offset(&mut self, offset: Vec2) {
        self.pan_offset = offset;
    }
}

/// The camera's rotation relative to the pivot for a heading (x) and pitch (y) pan offset.
pub fn aim_rotation(pan_offset: Vec2) -> DQuat {
    DQuat::from_euler(
        EulerRot::YXZ,
        -pan_offset.x as f64,
        pan_offset.y as f64,
        0.0,
    )
}

impl FollowCam {
    /// Place each follow camera behind its pivot and update its field of view.
    pub fn apply(mut cameras: Query<(&FollowCam, &mut Transform, &mut Projection)>) {
        for (follow, mut transform, mut projection) in cameras.iter_mut() {
            transform.translation = Vec3::Z * follow.distance;
            transform.rotation = aim_rotation(follow.pan_offset).as_quat();
            if let Projection::Perspective(perspective) = &mut *projection {
                let fov = follow.fov.to_radians();
                if perspective.fov != fov {
                    perspective.fov = fov;
                }
            }
        }
    }
}
