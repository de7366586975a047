//! Camera state remembered per vessel.

use std::f64::consts::FRAC_PI_6;

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::DQuat;
use bevy_reflect::prelude::*;
use serde::Serialize;
use toml::Table;

use crate::{
    error::CamError,
    settings::{parse_quat, read_f64},
};

/// The camera's orientation relative to a vessel, and its dolly distance.
///
/// Lives on the vessel entity. Created the first time the camera targets the vessel, updated
/// every frame while it is the target, and read back when the camera returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Component, Reflect)]
pub struct VesselCamState {
    /// Pivot rotation in the vessel's frame.
    pub rotation: DQuat,
    /// Dolly distance.
    pub distance: f32,
}

impl Default for VesselCamState {
    /// A 30 degree tilt, 30 units out.
    fn default() -> Self {
        Self {
            rotation: DQuat::from_rotation_x(FRAC_PI_6),
            distance: 30.0,
        }
    }
}

#[derive(Serialize)]
struct StateRecord {
    rotation: [f64; 4],
    distance: f64,
}

impl VesselCamState {
    /// Read a persisted record, keeping defaults for missing or malformed fields.
    pub fn from_toml_table(table: &Table) -> Self {
        let mut state = Self::default();
        if let Some(value) = table.get("rotation") {
            match parse_quat(value) {
                Some(q) => state.rotation = q,
                None => warn!("Ignoring malformed vessel camera rotation {value}"),
            }
        }
        let mut distance = state.distance as f64;
        read_f64(table, "distance", &mut distance);
        state.distance = distance as f32;
        state
    }

    /// Write the state as a persisted record.
    pub fn to_toml_table(&self) -> Result<Table, CamError> {
        Ok(Table::try_from(StateRecord {
            rotation: self.rotation.to_array(),
            distance: self.distance as f64,
        })?)
    }
}
