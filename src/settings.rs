//! Global camera settings and their persistence.
//!
//! Settings are stored as a flat TOML table. Loading is best effort: a field that is missing or
//! malformed keeps its default and logs a warning, so one bad value never discards the rest.

use std::{fs, io, path::Path};

use bevy_log::prelude::*;
use bevy_math::DQuat;
use bevy_reflect::prelude::*;
use serde::Serialize;
use toml::{Table, Value};

use crate::{controller::mode::Mode, error::CamError};

/// Tunables and per-mode state shared by the controller, the configuration panel, and
/// persistence.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct CamSettings {
    /// Turns the controller off in every mode.
    pub disable_all: bool,
    /// Turns the controller off per mode, indexed by [`Mode::index`].
    pub disable_mode: [bool; 5],
    /// Saved home view per mode, relative to that mode's reference frame.
    pub saved_rotation: [DQuat; 5],
    /// Invert the pan offset drag.
    pub invert_offset: bool,
    /// Invert the pitch keys.
    pub invert_pitch: bool,
    /// Invert the yaw keys.
    pub invert_yaw: bool,
    /// Multiplier on pitch/yaw key rotation.
    pub key_sensitivity: f64,
    /// Field of view restored by a double-click, in degrees.
    pub default_fov: f32,
    /// Scale of the trackball relative to half the smaller screen dimension.
    pub sphere_scale: f64,
    /// Trackball units per pixel of pointer motion.
    pub orbit_sensitivity: f64,
    /// Squared length at or below which the natural secondary reference is too short to use
    /// and a world axis takes over. For velocities, 9.0 is 3 m/s.
    pub frame_lock_epsilon: f64,
}

impl Default for CamSettings {
    fn default() -> Self {
        Self {
            disable_all: false,
            disable_mode: [false; 5],
            saved_rotation: [DQuat::IDENTITY; 5],
            invert_offset: false,
            invert_pitch: false,
            invert_yaw: false,
            key_sensitivity: 1.0,
            default_fov: 60.0,
            sphere_scale: 1.0,
            orbit_sensitivity: 0.005,
            frame_lock_epsilon: 9.0,
        }
    }
}

/// The on-disk shape of [`CamSettings`].
#[derive(Serialize)]
struct SettingsFile {
    disable: [bool; 6],
    frame_rotations: Vec<[f64; 4]>,
    invert_camera_offset: bool,
    invert_key_pitch: bool,
    invert_key_yaw: bool,
    camera_key_sensitivity: f64,
    fov_default: f32,
    sphere_scale: f64,
    orbit_sensitivity: f64,
    frame_lock_epsilon: f64,
}

impl CamSettings {
    /// Is the controller disabled for `mode`?
    pub fn is_disabled(&self, mode: Mode) -> bool {
        self.disable_all || self.disable_mode[mode.index()]
    }

    /// Parse settings from a TOML document, keeping defaults for missing or malformed fields.
    pub fn from_toml_str(text: &str) -> Result<Self, CamError> {
        let table: Table = text.parse()?;
        let mut settings = Self::default();
        settings.read_table(&table);
        Ok(settings)
    }

    /// Write the settings as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, CamError> {
        let mut disable = [self.disable_all; 6];
        disable[1..].copy_from_slice(&self.disable_mode);
        let file = SettingsFile {
            disable,
            frame_rotations: self.saved_rotation.iter().map(|q| q.to_array()).collect(),
            invert_camera_offset: self.invert_offset,
            invert_key_pitch: self.invert_pitch,
            invert_key_yaw: self.invert_yaw,
            camera_key_sensitivity: self.key_sensitivity,
            fov_default: self.default_fov,
            sphere_scale: self.sphere_scale,
            orbit_sensitivity: self.orbit_sensitivity,
            frame_lock_epsilon: self.frame_lock_epsilon,
        };
        Ok(toml::to_string(&file)?)
    }

    /// Load settings from `path`. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CamError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No camera settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(CamError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Save settings to `path`, creating its directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CamError> {
        let path = path.as_ref();
        let io_error = |source| CamError::Io {
            path: path.to_owned(),
            source,
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_error)
    }

    fn read_table(&mut self, table: &Table) {
        if let Some(value) = table.get("disable") {
            match value.as_array() {
                Some(flags) => {
                    let targets = std::iter::once(&mut self.disable_all)
                        .chain(self.disable_mode.iter_mut());
                    for (flag, target) in flags.iter().zip(targets) {
                        match flag.as_bool() {
                            Some(flag) => *target = flag,
                            None => warn!("Ignoring malformed disable flag {flag}"),
                        }
                    }
                }
                None => warn!("Ignoring malformed disable flags {value}"),
            }
        }
        if let Some(value) = table.get("frame_rotations") {
            match value.as_array() {
                Some(rotations) => {
                    for (value, target) in rotations.iter().zip(self.saved_rotation.iter_mut()) {
                        match parse_quat(value) {
                            Some(q) => *target = q,
                            None => warn!("Ignoring malformed saved rotation {value}"),
                        }
                    }
                }
                None => warn!("Ignoring malformed saved rotations {value}"),
            }
        }
        read_bool(table, "invert_camera_offset", &mut self.invert_offset);
        read_bool(table, "invert_key_pitch", &mut self.invert_pitch);
        read_bool(table, "invert_key_yaw", &mut self.invert_yaw);
        read_f64(table, "camera_key_sensitivity", &mut self.key_sensitivity);
        let mut fov = self.default_fov as f64;
        read_f64(table, "fov_default", &mut fov);
        self.default_fov = fov as f32;
        read_f64(table, "sphere_scale", &mut self.sphere_scale);
        read_f64(table, "orbit_sensitivity", &mut self.orbit_sensitivity);
        read_f64(table, "frame_lock_epsilon", &mut self.frame_lock_epsilon);
    }
}

pub(crate) fn read_bool(table: &Table, key: &str, out: &mut bool) {
    if let Some(value) = table.get(key) {
        match value.as_bool() {
            Some(b) => *out = b,
            None => warn!("Ignoring malformed {key} = {value}"),
        }
    }
}

pub(crate) fn read_f64(table: &Table, key: &str, out: &mut f64) {
    if let Some(value) = table.get(key) {
        match as_f64(value) {
            Some(x) => *out = x,
            None => warn!("Ignoring malformed {key} = {value}"),
        }
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let x = match value {
        Value::Float(x) => *x,
        Value::Integer(i) => *i as f64,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// A quaternion stored as `[x, y, z, w]`. Rejects anything that is not four finite numbers
/// describing a rotation.
pub(crate) fn parse_quat(value: &Value) -> Option<DQuat> {
    let array = value.as_array()?;
    let [x, y, z, w] = array.as_slice() else {
        return None;
    };
    let q = DQuat::from_xyzw(as_f64(x)?, as_f64(y)?, as_f64(z)?, as_f64(w)?);
    if q.is_normalized() {
        Some(q)
    } else {
        (q.length_squared() > 0.0).then(|| q.normalize())
    }
}
