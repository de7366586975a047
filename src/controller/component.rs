//! The primary [`Component`] of the controller, [`VesselCam`].

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::DQuat;
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;

use super::{
    host::{aim_rotation, FollowCam, HostCamera},
    inputs::{manual_rotation, FrameInput},
    mode::Mode,
    reference::{FlightKinematics, ReferenceVectors},
    snap::{look_rotation, SnapAction},
    tracker::FrameTracker,
    zoom,
};
use crate::{
    events::{ConfigPanelToggled, SettingsChanged, SoiChanged, UiVisibility, VesselChanged},
    settings::CamSettings,
    vessel_state::VesselCamState,
};

/// Orients the pivot of a follow camera so the view holds still relative to a moving reference
/// frame, while letting the user rotate it by hand.
///
/// Put this on the pivot entity, together with the host's [`FlightKinematics`]. The rendering
/// camera is a separate entity carrying a [`FollowCam`], usually a child of the pivot, and is
/// named by [`VesselCam::camera`].
///
/// # Each frame
///
/// 1. When disabled (globally or for the selected mode), only the mode-select and toggle keys
///    are serviced and the pivot is left alone.
/// 2. The reference vectors for the selected mode are resolved from the kinematics.
/// 3. The reference baseline is recaptured if the vessel, sphere of influence, mode or secondary
///    axis changed.
/// 4. In locked mode the pivot turns with the vessel.
/// 5. Manual input is serviced: zoom, pan, trackball drag, pitch/yaw keys, mode and snap keys.
/// 6. A manual rotation is applied on top, after which the baseline is recaptured from the new
///    orientation. Without one, an auto-rotating mode replays the reference rotation instead.
/// 7. The pivot's rotation relative to the vessel and the dolly distance are written into the
///    vessel's [`VesselCamState`].
#[derive(Debug, Clone, Reflect, Component)]
pub struct VesselCam {
    /// The entity with this pivot's [`FollowCam`].
    pub camera: Entity,
    /// Tunables, disable flags and saved views. Shared with the configuration panel and
    /// persistence.
    pub settings: CamSettings,
    mode: Mode,
    pivot: DQuat,
    tracker: FrameTracker,
    references: ReferenceVectors,
    target: Option<Entity>,
    vessel_rotation: DQuat,
    ui_hidden: bool,
    panel_open: bool,
}

/// Which path moved the pivot this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotUpdate {
    /// The controller is disabled; the host's default behavior applies.
    Disabled,
    /// No kinematics or no central body; the pivot holds its orientation.
    NoReference,
    /// A manual rotation was applied.
    Manual,
    /// The pivot followed the rotating reference frame.
    AutoRotate,
    /// Locked mode: the pivot followed the vessel's own rotation.
    PassThrough,
}

/// The outcome of one [`VesselCam::update_pivot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Which path moved the pivot.
    pub update: PivotUpdate,
    /// The settings changed and should be persisted.
    pub settings_changed: bool,
    /// The configuration panel was opened (`Some(true)`) or closed (`Some(false)`).
    pub panel_open: Option<bool>,
}

impl FrameReport {
    fn new(update: PivotUpdate) -> Self {
        Self {
            update,
            settings_changed: false,
            panel_open: None,
        }
    }
}

impl VesselCam {
    /// Create a controller driving the [`FollowCam`] on `camera`.
    pub fn new(camera: Entity) -> Self {
        Self {
            camera,
            settings: CamSettings::default(),
            mode: Mode::default(),
            pivot: DQuat::IDENTITY,
            tracker: FrameTracker::default(),
            references: ReferenceVectors::default(),
            target: None,
            vessel_rotation: DQuat::IDENTITY,
            ui_hidden: false,
            panel_open: false,
        }
    }

    /// Start with the given settings.
    pub fn with_settings(self, settings: CamSettings) -> Self {
        Self { settings, ..self }
    }

    /// Start in the given mode.
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// Start with the pivot at `rotation`.
    pub fn with_pivot(self, rotation: DQuat) -> Self {
        Self {
            pivot: rotation.normalize(),
            ..self
        }
    }

    /// The selected mode. May be [`Mode::Auto`].
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Select a mode. Any change recaptures the reference baseline so the view does not jump.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            debug!("Vessel camera mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.tracker.request_recapture();
        }
    }

    /// The pivot's world rotation.
    pub fn pivot(&self) -> DQuat {
        self.pivot
    }

    /// The reference vectors resolved on the last enabled frame.
    pub fn references(&self) -> &ReferenceVectors {
        &self.references
    }

    /// The reference baseline.
    pub fn tracker(&self) -> &FrameTracker {
        &self.tracker
    }

    /// The vessel currently followed.
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Is the configuration panel open?
    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Is the controller disabled for the selected mode?
    pub fn is_disabled(&self) -> bool {
        self.settings.is_disabled(self.mode)
    }

    /// Recapture the reference baseline on the next frame.
    pub fn request_recapture(&mut self) {
        self.tracker.request_recapture();
    }

    /// `vessel` changed sphere of influence.
    pub fn on_soi_changed(&mut self, vessel: Entity) {
        if self.target == Some(vessel) {
            self.tracker.request_recapture();
        }
    }

    /// Is manual input suspended because the host's UI is hidden?
    pub fn ui_hidden(&self) -> bool {
        self.ui_hidden
    }

    /// The host hid or showed its UI. Manual input is ignored while hidden.
    pub fn set_ui_hidden(&mut self, hidden: bool) {
        self.ui_hidden = hidden;
    }

    /// Update all pivots. Called once per frame, after the host has updated
    /// [`FlightKinematics`] and before transforms propagate.
    pub fn update_pivots(
        mut pivots: Query<(
            Entity,
            &mut VesselCam,
            &mut Transform,
            Option<&FlightKinematics>,
        )>,
        mut hosts: Query<&mut FollowCam>,
        mut vessels: Query<&mut VesselCamState>,
        input: Res<FrameInput>,
        mut commands: Commands,
        mut panel_events: EventWriter<ConfigPanelToggled>,
        mut settings_events: EventWriter<SettingsChanged>,
    ) {
        for (entity, mut cam, mut transform, kinematics) in pivots.iter_mut() {
            let Ok(mut host) = hosts.get_mut(cam.camera) else {
                warn_once!("VesselCam camera entity has no FollowCam");
                continue;
            };
            let report = match kinematics {
                Some(kinematics) => match vessels.get_mut(kinematics.vessel) {
                    Ok(mut state) => {
                        cam.update_pivot(Some(kinematics), Some(&mut *state), &input, &mut *host)
                    }
                    Err(_) => {
                        let mut state = VesselCamState::default();
                        let report =
                            cam.update_pivot(Some(kinematics), Some(&mut state), &input, &mut *host);
                        if let Ok(mut vessel) = commands.get_entity(kinematics.vessel) {
                            vessel.try_insert(state);
                        }
                        report
                    }
                },
                None => cam.update_pivot(None, None, &input, &mut *host),
            };

            if !matches!(report.update, PivotUpdate::Disabled | PivotUpdate::NoReference) {
                let rotation = cam.pivot.as_quat();
                if transform.rotation != rotation {
                    transform.rotation = rotation;
                }
            }
            if let Some(open) = report.panel_open {
                panel_events.write(ConfigPanelToggled {
                    camera: entity,
                    open,
                });
            }
            if report.settings_changed {
                settings_events.write(SettingsChanged { camera: entity });
            }
        }
    }

    /// Forward the host's lifecycle events to every [`VesselCam`].
    pub fn receive_lifecycle_events(
        mut vessel_changed: EventReader<VesselChanged>,
        mut soi_changed: EventReader<SoiChanged>,
        mut ui_visibility: EventReader<UiVisibility>,
        mut cameras: Query<&mut VesselCam>,
    ) {
        // Any vessel switch recaptures every camera; cameras follow whatever their kinematics
        // name, so the new vessel is only logged.
        let mut switched = false;
        for event in vessel_changed.read() {
            debug!("Active vessel changed to {:?}", event.vessel);
            switched = true;
        }
        let soi_changed: Vec<Entity> = soi_changed.read().map(|event| event.vessel).collect();
        let ui_hidden = ui_visibility.read().last().map(|event| event.hidden);
        if !switched && soi_changed.is_empty() && ui_hidden.is_none() {
            return;
        }
        for mut cam in cameras.iter_mut() {
            if switched {
                cam.request_recapture();
            }
            for &vessel in &soi_changed {
                cam.on_soi_changed(vessel);
            }
            if let Some(hidden) = ui_hidden {
                cam.set_ui_hidden(hidden);
            }
        }
    }

    /// Run one frame of the controller. See [`VesselCam`] for the sequence.
    ///
    /// `vessel_state` is the [`VesselCamState`] of the vessel in `kinematics`; it is read when
    /// the camera switches to that vessel and written at the end of every enabled frame.
    pub fn update_pivot(
        &mut self,
        kinematics: Option<&FlightKinematics>,
        vessel_state: Option<&mut VesselCamState>,
        input: &FrameInput,
        host: &mut impl HostCamera,
    ) -> FrameReport {
        let mut report = FrameReport::new(PivotUpdate::Disabled);
        if self.is_disabled() {
            // Forget the target so the remembered view is restored when re-enabled.
            self.target = None;
            self.service_mode_keys(input);
            self.service_toggle_key(input, &mut report);
            return report;
        }

        report.update = PivotUpdate::NoReference;
        let Some(kinematics) = kinematics else {
            warn_once!("Vessel camera has no flight kinematics, holding orientation");
            return report;
        };
        let mut scratch_state = VesselCamState::default();
        let state = vessel_state.unwrap_or(&mut scratch_state);
        if self.target != Some(kinematics.vessel) {
            self.switch_target(kinematics, state, host);
        }

        let Some(references) =
            ReferenceVectors::resolve(self.mode, kinematics, self.settings.frame_lock_epsilon)
        else {
            warn_once!("Vessel camera has no reference frame, holding orientation");
            return report;
        };
        self.references = references;
        self.tracker.observe_axis(references.secondary_axis);
        if self.tracker.recapture_if_flagged(self.pivot, &references) {
            debug!(
                "Vessel camera recaptured baseline against {:?}",
                references.secondary_axis
            );
        }

        // A locked pivot turns with the vessel every frame; manual input and snaps act on top.
        if !references.auto_rotate {
            let follow = kinematics.vessel_rotation * self.vessel_rotation.inverse();
            self.apply_pivot(follow * self.pivot);
        }
        self.vessel_rotation = kinematics.vessel_rotation;

        let manual = if self.ui_hidden {
            None
        } else {
            self.service_input(input, kinematics, host, &mut report)
        };

        report.update = if let Some(delta) = manual {
            self.apply_pivot(delta * self.pivot);
            self.tracker.capture(self.pivot, &references);
            PivotUpdate::Manual
        } else if references.auto_rotate {
            let rotation = self.tracker.replay(self.pivot, &references);
            self.apply_pivot(rotation * self.pivot);
            PivotUpdate::AutoRotate
        } else {
            PivotUpdate::PassThrough
        };

        state.rotation = (kinematics.vessel_rotation.inverse() * self.pivot).normalize();
        state.distance = host.distance();
        report
    }

    fn switch_target(
        &mut self,
        kinematics: &FlightKinematics,
        state: &VesselCamState,
        host: &mut impl HostCamera,
    ) {
        debug!("Vessel camera now following {:?}", kinematics.vessel);
        self.target = Some(kinematics.vessel);
        self.vessel_rotation = kinematics.vessel_rotation;
        self.apply_pivot(kinematics.vessel_rotation * state.rotation);
        host.set_distance(state.distance);
        self.tracker.request_recapture();
    }

    /// Zoom, pan, and the hotkeys. Returns the manual rotation requested this frame, if any.
    fn service_input(
        &mut self,
        input: &FrameInput,
        kinematics: &FlightKinematics,
        host: &mut impl HostCamera,
        report: &mut FrameReport,
    ) -> Option<DQuat> {
        let view = self.pivot * aim_rotation(host.pan_offset());
        let mut manual = manual_rotation(input, self.pivot, view, &self.settings);
        zoom::zoom_from_input(host, input);
        zoom::pan_from_input(host, input, &self.settings);
        self.service_mode_keys(input);
        if let Some(delta) = self.service_snap_key(input, kinematics, report) {
            manual = Some(delta);
        }
        self.service_toggle_key(input, report);
        manual
    }

    fn service_mode_keys(&mut self, input: &FrameInput) {
        if let Some(mode) = input.mode_select {
            self.set_mode(mode);
        }
    }

    /// Snaps in locked mode are applied as a manual rotation, which is returned. Otherwise the
    /// baseline is rewritten so this frame's replay carries the pivot to the snapped view.
    fn service_snap_key(
        &mut self,
        input: &FrameInput,
        kinematics: &FlightKinematics,
        report: &mut FrameReport,
    ) -> Option<DQuat> {
        let view = input.snap?;
        let locked = !self.references.auto_rotate;
        let frame = if locked {
            kinematics.vessel_rotation
        } else {
            look_rotation(self.references.primary, self.references.secondary)
        };
        let index = self.mode.index();
        match view.action(
            input.modifier,
            frame,
            self.pivot,
            self.settings.saved_rotation[index],
        ) {
            SnapAction::Save(saved) => {
                debug!("Saved home view for {:?}", self.mode);
                self.settings.saved_rotation[index] = saved;
                report.settings_changed = true;
                None
            }
            SnapAction::Target(target) if locked => Some(target * self.pivot.inverse()),
            SnapAction::Target(target) => {
                self.tracker.rebase(self.pivot, target);
                None
            }
        }
    }

    /// Without the modifier, opens or closes the configuration panel. With it, closes the panel
    /// and toggles the current mode's disable flag, clearing the global flag first if it is set.
    fn service_toggle_key(&mut self, input: &FrameInput, report: &mut FrameReport) {
        if !input.toggle {
            return;
        }
        if !input.modifier {
            self.panel_open = !self.panel_open;
            report.panel_open = Some(self.panel_open);
            report.settings_changed |= !self.panel_open;
            return;
        }
        if self.panel_open {
            self.panel_open = false;
            report.panel_open = Some(false);
        }
        let index = self.mode.index();
        if self.settings.disable_all {
            self.settings.disable_all = false;
            self.settings.disable_mode[index] = false;
        } else {
            self.settings.disable_mode[index] = !self.settings.disable_mode[index];
        }
        report.settings_changed = true;
        if self.is_disabled() {
            debug!("Vessel camera disabled for {:?}", self.mode);
            self.target = None;
        } else {
            debug!("Vessel camera enabled for {:?}", self.mode);
            self.tracker.request_recapture();
        }
    }

    /// Non-finite rotations are discarded, keeping the last good orientation.
    fn apply_pivot(&mut self, rotation: DQuat) {
        if rotation.is_finite() && rotation.length_squared() > 0.0 {
            self.pivot = rotation.normalize();
        } else {
            warn_once!("Discarding non-finite vessel camera rotation");
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::{DVec2, DVec3, Vec2};

    use super::*;
    use crate::controller::{inputs::drag_rotation, mode::SecondaryAxis, snap::SnapView};

    fn kinematics() -> FlightKinematics {
        FlightKinematics {
            body_direction: Some(DVec3::new(0.0, -700_000.0, 0.0)),
            orbital_velocity: DVec3::new(0.0, 0.0, -2_300.0),
            surface_velocity: DVec3::new(120.0, 0.0, 10.0),
            ..FlightKinematics::new(Entity::from_raw(1))
        }
    }

    fn cam(mode: Mode) -> VesselCam {
        VesselCam::new(Entity::from_raw(2)).with_mode(mode)
    }

    fn frame(
        cam: &mut VesselCam,
        k: &FlightKinematics,
        input: &FrameInput,
        host: &mut FollowCam,
    ) -> FrameReport {
        let mut state = VesselCamState::default();
        cam.update_pivot(Some(k), Some(&mut state), input, host)
    }

    #[test]
    fn first_frame_restores_vessel_state() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let mut k = kinematics();
        k.vessel_rotation = DQuat::from_rotation_y(0.7);
        let mut state = VesselCamState {
            rotation: DQuat::from_rotation_x(-0.2),
            distance: 55.0,
        };
        let expected = k.vessel_rotation * state.rotation;
        let report = cam.update_pivot(Some(&k), Some(&mut state), &FrameInput::default(), &mut host);
        assert_eq!(report.update, PivotUpdate::AutoRotate);
        assert_eq!(cam.target(), Some(k.vessel));
        assert_eq!(host.distance, 55.0);
        assert!(cam.pivot().abs_diff_eq(expected, 1e-12));
        assert!(state.rotation.abs_diff_eq(DQuat::from_rotation_x(-0.2), 1e-12));
    }

    #[test]
    fn missing_kinematics_is_a_no_op() {
        let mut cam = cam(Mode::Free).with_pivot(DQuat::from_rotation_z(0.3));
        let mut host = FollowCam::default();
        let report = cam.update_pivot(None, None, &FrameInput::default(), &mut host);
        assert_eq!(report.update, PivotUpdate::NoReference);
        assert!(cam.pivot().abs_diff_eq(DQuat::from_rotation_z(0.3), 1e-15));

        let mut k = kinematics();
        k.body_direction = None;
        let report = frame(&mut cam, &k, &FrameInput::default(), &mut host);
        assert_eq!(report.update, PivotUpdate::NoReference);
    }

    #[test]
    fn manual_rotation_becomes_new_baseline() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);

        let input = FrameInput {
            orbit_keys: DVec2::new(0.0, 1.0),
            real_delta_secs: 0.1,
            ..Default::default()
        };
        let before = cam.pivot();
        let report = frame(&mut cam, &k, &input, &mut host);
        assert_eq!(report.update, PivotUpdate::Manual);
        let after = cam.pivot();
        assert!(!after.abs_diff_eq(before, 1e-6));

        // With nothing changing, the new orientation holds.
        let report = frame(&mut cam, &k, &FrameInput::default(), &mut host);
        assert_eq!(report.update, PivotUpdate::AutoRotate);
        assert!(cam.pivot().abs_diff_eq(after, 1e-12));
    }

    #[test]
    fn hidden_ui_suspends_manual_input_only() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        cam.set_ui_hidden(true);
        let input = FrameInput {
            orbit_keys: DVec2::new(1.0, 0.0),
            real_delta_secs: 0.1,
            wheel: 0.5,
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &input, &mut host);
        assert_eq!(report.update, PivotUpdate::AutoRotate);
        assert_eq!(host.distance, 30.0);
    }

    #[test]
    fn locked_mode_follows_vessel_rotation() {
        let mut cam = cam(Mode::Locked);
        let mut host = FollowCam::default();
        let mut k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        let start = cam.pivot();

        let turn = DQuat::from_rotation_x(0.25);
        k.vessel_rotation = turn * k.vessel_rotation;
        let report = frame(&mut cam, &k, &FrameInput::default(), &mut host);
        assert_eq!(report.update, PivotUpdate::PassThrough);
        assert!(cam.pivot().abs_diff_eq(turn * start, 1e-12));
    }

    #[test]
    fn locked_manual_input_keeps_up_with_tumbling_vessel() {
        let mut cam = cam(Mode::Locked);
        let mut host = FollowCam::default();
        let mut k = kinematics();
        let mut state = VesselCamState::default();
        cam.update_pivot(Some(&k), Some(&mut state), &FrameInput::default(), &mut host);
        let relative = state.rotation;

        // A pitch tap too short to matter, while the vessel spins.
        let tap = FrameInput {
            orbit_keys: DVec2::new(1.0, 0.0),
            real_delta_secs: 1e-9,
            ..Default::default()
        };
        for _ in 0..10 {
            k.vessel_rotation = DQuat::from_rotation_y(0.2) * k.vessel_rotation;
            let report = cam.update_pivot(Some(&k), Some(&mut state), &tap, &mut host);
            assert_eq!(report.update, PivotUpdate::Manual);
        }
        let drift = relative.angle_between(state.rotation);
        assert!(drift < 1e-6, "drifted {drift} rad off the vessel");
        assert!(cam
            .pivot()
            .abs_diff_eq(k.vessel_rotation * state.rotation, 1e-12));
    }

    #[test]
    fn drag_axis_includes_pan_offset() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam {
            pan_offset: Vec2::new(0.2, -0.1),
            ..Default::default()
        };
        let k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        let before = cam.pivot();

        let input = FrameInput {
            screen_size: DVec2::new(1000.0, 800.0),
            pointer_position: Some(DVec2::new(620.0, 450.0)),
            pointer_delta: DVec2::new(0.0, 30.0),
            rotate_held: true,
            ..Default::default()
        };
        let view = before * aim_rotation(host.pan_offset);
        let delta = drag_rotation(&input, view, &cam.settings).unwrap();
        let unaimed = drag_rotation(&input, before, &cam.settings).unwrap();
        assert!(!delta.abs_diff_eq(unaimed, 1e-6));

        let report = frame(&mut cam, &k, &input, &mut host);
        assert_eq!(report.update, PivotUpdate::Manual);
        assert!(cam.pivot().abs_diff_eq((delta * before).normalize(), 1e-12));
    }

    #[test]
    fn disabled_mode_only_services_mode_and_toggle_keys() {
        let mut cam = cam(Mode::Free);
        cam.settings.disable_mode[Mode::Free.index()] = true;
        let mut host = FollowCam::default();
        let k = kinematics();
        let input = FrameInput {
            orbit_keys: DVec2::new(1.0, 0.0),
            real_delta_secs: 0.1,
            wheel: 0.5,
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &input, &mut host);
        assert_eq!(report.update, PivotUpdate::Disabled);
        assert_eq!(cam.pivot(), DQuat::IDENTITY);
        assert_eq!(host.distance, 30.0);

        let select = FrameInput {
            mode_select: Some(Mode::Orbital),
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &select, &mut host);
        assert_eq!(report.update, PivotUpdate::Disabled);
        assert_eq!(cam.mode(), Mode::Orbital);
        let report = frame(&mut cam, &k, &FrameInput::default(), &mut host);
        assert_eq!(report.update, PivotUpdate::AutoRotate);
    }

    #[test]
    fn toggle_with_modifier_clears_global_disable_first() {
        let mut cam = cam(Mode::Chase);
        cam.settings.disable_all = true;
        cam.settings.disable_mode[Mode::Chase.index()] = true;
        let mut host = FollowCam::default();
        let k = kinematics();
        let toggle = FrameInput {
            toggle: true,
            modifier: true,
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &toggle, &mut host);
        assert!(report.settings_changed);
        assert!(!cam.is_disabled());

        let report = frame(&mut cam, &k, &toggle, &mut host);
        assert!(report.settings_changed);
        assert!(cam.is_disabled());
        assert!(cam.settings.disable_mode[Mode::Chase.index()]);
        assert!(!cam.settings.disable_all);
    }

    #[test]
    fn toggle_opens_and_closes_panel() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let k = kinematics();
        let toggle = FrameInput {
            toggle: true,
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &toggle, &mut host);
        assert_eq!(report.panel_open, Some(true));
        assert!(!report.settings_changed);
        let report = frame(&mut cam, &k, &toggle, &mut host);
        assert_eq!(report.panel_open, Some(false));
        assert!(report.settings_changed);
    }

    #[test]
    fn snap_glides_via_baseline_in_auto_modes() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        let snap = FrameInput {
            snap: Some(SnapView::Primary),
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &snap, &mut host);
        assert_eq!(report.update, PivotUpdate::AutoRotate);
        let forward = cam.pivot() * DVec3::NEG_Z;
        assert!(forward.abs_diff_eq(DVec3::NEG_Y, 1e-9));
        let up = cam.pivot() * DVec3::Y;
        assert!(up.abs_diff_eq(cam.references().secondary.normalize(), 1e-9));
    }

    #[test]
    fn snap_is_manual_in_locked_mode() {
        let mut cam = cam(Mode::Locked);
        let mut host = FollowCam::default();
        let mut k = kinematics();
        k.vessel_rotation = DQuat::from_rotation_y(1.2);
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        // The vessel keeps turning on the snap frame.
        k.vessel_rotation = DQuat::from_rotation_z(0.4) * k.vessel_rotation;
        let snap = FrameInput {
            snap: Some(SnapView::Primary),
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &snap, &mut host);
        assert_eq!(report.update, PivotUpdate::Manual);
        assert!(cam.pivot().dot(k.vessel_rotation).abs() > 1.0 - 1e-12);
    }

    #[test]
    fn home_view_save_and_recall() {
        let mut cam = cam(Mode::Orbital);
        let mut host = FollowCam::default();
        let k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        let home = cam.pivot();

        let save = FrameInput {
            snap: Some(SnapView::Home),
            modifier: true,
            ..Default::default()
        };
        let report = frame(&mut cam, &k, &save, &mut host);
        assert!(report.settings_changed);
        assert!(cam.pivot().abs_diff_eq(home, 1e-12));

        let spin = FrameInput {
            orbit_keys: DVec2::new(1.0, 1.0),
            real_delta_secs: 0.5,
            ..Default::default()
        };
        frame(&mut cam, &k, &spin, &mut host);
        assert!(!cam.pivot().abs_diff_eq(home, 1e-3));

        let recall = FrameInput {
            snap: Some(SnapView::Home),
            ..Default::default()
        };
        frame(&mut cam, &k, &recall, &mut host);
        assert!(cam.pivot().dot(home).abs() > 1.0 - 1e-9);
    }

    #[test]
    fn soi_change_only_concerns_target() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let k = kinematics();
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        cam.on_soi_changed(Entity::from_raw(99));
        assert!(!cam.tracker().recapture_pending());
        cam.on_soi_changed(k.vessel);
        assert!(cam.tracker().recapture_pending());
    }

    #[test]
    fn frame_lock_axis_reported() {
        let mut cam = cam(Mode::Free);
        let mut host = FollowCam::default();
        let mut k = kinematics();
        k.surface_velocity = DVec3::ZERO;
        frame(&mut cam, &k, &FrameInput::default(), &mut host);
        assert_eq!(cam.references().secondary_axis, SecondaryAxis::WorldX);
        assert_eq!(cam.tracker().secondary_axis(), SecondaryAxis::WorldX);
    }
}
