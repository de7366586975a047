//! Lifecycle events the controller listens to and emits.

use bevy_ecs::prelude::*;

/// The host switched the active vessel. All cameras recapture their reference baseline.
#[derive(Debug, Clone, Copy, Event)]
pub struct VesselChanged {
    /// The new active vessel.
    pub vessel: Entity,
}

/// A vessel moved into another body's sphere of influence. Cameras following that vessel
/// recapture their reference baseline.
#[derive(Debug, Clone, Copy, Event)]
pub struct SoiChanged {
    /// The vessel that changed sphere of influence.
    pub vessel: Entity,
}

/// The host hid or showed its UI. Manual camera input is ignored while the UI is hidden.
#[derive(Debug, Clone, Copy, Event)]
pub struct UiVisibility {
    /// Is the UI hidden?
    pub hidden: bool,
}

/// The configuration panel was opened or closed with the toggle key.
#[derive(Debug, Clone, Copy, Event)]
pub struct ConfigPanelToggled {
    /// The camera whose toggle key was pressed.
    pub camera: Entity,
    /// Is the panel now open?
    pub open: bool,
}

/// A camera's settings changed in a way that should be persisted.
#[derive(Debug, Clone, Copy, Event)]
pub struct SettingsChanged {
    /// The camera whose settings changed.
    pub camera: Entity,
}
