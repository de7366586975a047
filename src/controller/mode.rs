//! Camera modes and the tag describing which vector serves as the secondary reference.

use bevy_log::prelude::*;
use bevy_reflect::prelude::*;

/// The reference frame the camera holds still against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum Mode {
    /// Picks [`Mode::Free`], [`Mode::Orbital`] or [`Mode::Chase`] from the host's per-vessel
    /// classification.
    #[default]
    Auto,
    /// Primary reference is the direction to the central body, secondary is surface velocity.
    Free,
    /// Primary reference is the orbital velocity, secondary is a world axis.
    Orbital,
    /// Like [`Mode::Free`], but the secondary reference is the target direction when a target is
    /// set.
    Chase,
    /// Follows the vessel's own rotation.
    Locked,
}

impl Mode {
    /// All modes, in persisted order.
    pub const ALL: [Mode; 5] = [
        Mode::Auto,
        Mode::Free,
        Mode::Orbital,
        Mode::Chase,
        Mode::Locked,
    ];

    /// Index into per-mode tables such as saved views and disable flags.
    pub const fn index(self) -> usize {
        match self {
            Mode::Auto => 0,
            Mode::Free => 1,
            Mode::Orbital => 2,
            Mode::Chase => 3,
            Mode::Locked => 4,
        }
    }

    /// Resolve [`Mode::Auto`] through the host's classification of the vessel.
    ///
    /// A classifier that itself answers [`Mode::Auto`] is treated as [`Mode::Free`].
    pub fn resolve_auto(self, classified: Mode) -> Mode {
        match self {
            Mode::Auto => match classified {
                Mode::Auto => {
                    warn_once!("Vessel classified as Auto, falling back to Free");
                    Mode::Free
                }
                other => other,
            },
            other => other,
        }
    }
}

/// Which vector is currently serving as the secondary reference.
///
/// A change of tag between frames invalidates the cached secondary baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SecondaryAxis {
    /// No secondary reference (locked mode).
    #[default]
    None,
    /// World X, used by frame-lock.
    WorldX,
    /// World Y, used by frame-lock.
    WorldY,
    /// World Z, used by frame-lock.
    WorldZ,
    /// The natural secondary: surface velocity or target direction.
    Velocity,
}
