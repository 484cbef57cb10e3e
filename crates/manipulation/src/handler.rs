//! Manipulation gesture arbitration for a held object.
//!
//! One handler per manipulable object. While held, the primary input
//! source's touchpad drives rotation (circular motion, touchpad not
//! pressed) or scale/nudge (touchpad pressed, off-centre along X or Y).
//!
//! # Invariants
//! - Only the source that began the hold can drive or end it.
//! - Dual-axis samples on other actions never touch gesture state.
//! - Once rotation starts it excludes scale and nudge until the hold ends.
//! - Scale and nudge never both apply from the same sample.
//! - Scale and pointer extent stay strictly inside their constraints.

use glam::{Vec2, Vec3};
use mrkit_common::InputSourceId;
use mrkit_input::{InputData, InputEvent};

use crate::config::{ManipulationConfig, ManipulationConfigError, SelectMode};
use crate::target::ManipulationTarget;

/// Touchpad readings at or below this mean the finger lifted.
pub const TOUCH_LIFT_EPSILON: f32 = 1e-5;

/// What a single input sample did to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManipulationGesture {
    HoldBegan { source: InputSourceId },
    HoldEnded,
    Rotated { degrees: f32 },
    Scaled { scale: f32 },
    Nudged { extent: f32 },
}

#[derive(Debug, Clone)]
pub struct ManipulationHandler {
    config: ManipulationConfig,
    primary: Option<InputSourceId>,
    last_reading: Option<Vec2>,
    touch_pressed: bool,
    rotating: bool,
}

impl ManipulationHandler {
    pub fn new(config: ManipulationConfig) -> Result<Self, ManipulationConfigError> {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "rejecting manipulation config");
            return Err(e);
        }
        Ok(Self {
            config,
            primary: None,
            last_reading: None,
            touch_pressed: false,
            rotating: false,
        })
    }

    pub fn config(&self) -> &ManipulationConfig {
        &self.config
    }

    pub fn is_held(&self) -> bool {
        self.primary.is_some()
    }

    /// The source that owns the current hold.
    pub fn primary_source(&self) -> Option<InputSourceId> {
        self.primary
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_touch_pressed(&self) -> bool {
        self.touch_pressed
    }

    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        target: &mut dyn ManipulationTarget,
    ) -> Option<ManipulationGesture> {
        let actions = self.config.actions;
        match event.data {
            InputData::Digital(pressed) if event.action == actions.select => {
                self.process_select(event.source, pressed, target)
            }
            InputData::Digital(_) if event.action == actions.cancel => {
                if self.primary == Some(event.source) {
                    self.end_hold(target)
                } else {
                    None
                }
            }
            InputData::SingleAxis(value) if event.action == actions.touchpad_press => {
                if self.primary == Some(event.source) {
                    self.process_touchpad_press(value);
                }
                None
            }
            InputData::DualAxis(position) => {
                if self.primary == Some(event.source) {
                    self.process_dual_axis(event, position, target)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Move the held object to where the pointer now places it.
    pub fn follow(&mut self, point: Vec3, target: &mut dyn ManipulationTarget) -> bool {
        if !self.is_held() {
            return false;
        }
        target.set_position(point);
        true
    }

    pub fn begin_hold(
        &mut self,
        source: InputSourceId,
        target: &mut dyn ManipulationTarget,
    ) -> Option<ManipulationGesture> {
        if self.primary.is_some() {
            return None;
        }
        tracing::debug!(source = source.0, "hold began");
        self.primary = Some(source);
        self.reset_gesture();
        target.set_colliders_active(false);
        Some(ManipulationGesture::HoldBegan { source })
    }

    pub fn end_hold(
        &mut self,
        target: &mut dyn ManipulationTarget,
    ) -> Option<ManipulationGesture> {
        let source = self.primary.take()?;
        tracing::debug!(source = source.0, "hold ended");
        self.reset_gesture();
        target.set_colliders_active(true);
        Some(ManipulationGesture::HoldEnded)
    }

    /// Drop any hold, e.g. when the object is disabled.
    pub fn stop(&mut self, target: &mut dyn ManipulationTarget) {
        self.end_hold(target);
    }

    fn reset_gesture(&mut self) {
        self.last_reading = None;
        self.touch_pressed = false;
        self.rotating = false;
    }

    fn process_select(
        &mut self,
        source: InputSourceId,
        pressed: bool,
        target: &mut dyn ManipulationTarget,
    ) -> Option<ManipulationGesture> {
        if self.primary.is_some_and(|p| p != source) {
            return None;
        }
        match (self.config.select_mode, pressed) {
            (SelectMode::PressAndHold, true) => self.begin_hold(source, target),
            (SelectMode::PressAndHold, false) => self.end_hold(target),
            (SelectMode::Toggle, true) => None,
            (SelectMode::Toggle, false) => {
                if self.is_held() {
                    self.end_hold(target)
                } else {
                    self.begin_hold(source, target)
                }
            }
        }
    }

    fn process_touchpad_press(&mut self, value: f32) {
        if value <= TOUCH_LIFT_EPSILON {
            self.last_reading = None;
        }
        if self.rotating {
            return;
        }
        let threshold = self.config.press_threshold;
        if !self.touch_pressed && value >= threshold {
            self.touch_pressed = true;
        } else if self.touch_pressed && value < threshold {
            self.touch_pressed = false;
        }
    }

    fn process_dual_axis(
        &mut self,
        event: &InputEvent,
        position: Vec2,
        target: &mut dyn ManipulationTarget,
    ) -> Option<ManipulationGesture> {
        let actions = self.config.actions;
        if ![actions.rotate, actions.scale, actions.nudge].contains(&event.action) {
            return None;
        }
        let magnitude = position.abs();
        let mut gesture = None;

        let rotation_zone = self.config.rotation_zone;
        let rotation_possible = event.action == actions.rotate
            && (rotation_zone.admits(magnitude.x) || rotation_zone.admits(magnitude.y));
        if rotation_possible && !self.touch_pressed {
            if let Some(last) = self.last_reading {
                let angle = signed_angle(last, position);
                if angle.abs() > self.config.rotation_activation_angle {
                    self.rotating = true;
                }
                if self.rotating {
                    target.rotate_yaw(-angle);
                    gesture = Some(ManipulationGesture::Rotated { degrees: -angle });
                }
            }
        }
        self.last_reading = Some(position);

        if !self.touch_pressed || self.rotating {
            return gesture;
        }

        let scale_possible =
            event.action == actions.scale && self.config.scale_zone.contains(magnitude.x);
        let nudge_possible =
            event.action == actions.nudge && self.config.nudge_zone.contains(magnitude.y);
        match (scale_possible, nudge_possible) {
            (true, true) => {
                tracing::trace!(?position, "scale and nudge both possible, ignoring");
                None
            }
            (true, false) => Some(self.scale(position.x, target)),
            (false, true) => Some(self.nudge(position.y, target)),
            (false, false) => None,
        }
    }

    fn scale(&self, x: f32, target: &mut dyn ManipulationTarget) -> ManipulationGesture {
        let limits = self.config.scale_constraints;
        let current = target.uniform_scale();
        let next = if x < 0.0 {
            current * self.config.scale_amount
        } else {
            current / self.config.scale_amount
        };
        let rejected = if x < 0.0 {
            next <= limits.min
        } else {
            next >= limits.max
        };
        let scale = if rejected { current } else { next };
        target.set_uniform_scale(scale);
        ManipulationGesture::Scaled { scale }
    }

    fn nudge(&self, y: f32, target: &mut dyn ManipulationTarget) -> ManipulationGesture {
        let limits = self.config.nudge_constraints;
        let current = target.pointer_extent().min(target.ray_distance());
        let (next, rejected) = if y < 0.0 {
            let next = current - self.config.nudge_amount;
            (next, next <= limits.min)
        } else {
            let next = current + self.config.nudge_amount;
            (next, next >= limits.max)
        };
        let extent = if rejected { current } else { next };
        target.set_pointer_extent(extent);
        ManipulationGesture::Nudged { extent }
    }
}

/// Counter-clockwise angle in degrees from `from` to `to`.
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to)).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManipulationActions;
    use crate::target::HeldObject;
    use mrkit_common::{Handedness, InputAction};

    const SELECT: InputAction = InputAction(1);
    const TOUCH: InputAction = InputAction(2);
    const PAD: InputAction = InputAction(3);
    const CANCEL: InputAction = InputAction(4);
    const HAND: InputSourceId = InputSourceId(7);
    const OTHER: InputSourceId = InputSourceId(8);

    fn config(mode: SelectMode) -> ManipulationConfig {
        ManipulationConfig {
            actions: ManipulationActions {
                select: SELECT,
                touchpad_press: TOUCH,
                rotate: PAD,
                scale: PAD,
                nudge: PAD,
                cancel: CANCEL,
            },
            select_mode: mode,
            ..ManipulationConfig::default()
        }
    }

    struct Harness {
        handler: ManipulationHandler,
        obj: HeldObject,
    }

    impl Harness {
        fn new(mode: SelectMode) -> Self {
            Self {
                handler: ManipulationHandler::new(config(mode)).unwrap(),
                obj: HeldObject::default(),
            }
        }

        fn held() -> Self {
            let mut h = Self::new(SelectMode::PressAndHold);
            h.select(HAND, true);
            h
        }

        fn select(&mut self, source: InputSourceId, pressed: bool) -> Option<ManipulationGesture> {
            let ev = InputEvent::digital(source, Handedness::Right, SELECT, pressed);
            self.handler.handle_input(&ev, &mut self.obj)
        }

        fn touch(&mut self, value: f32) -> Option<ManipulationGesture> {
            let ev = InputEvent::single_axis(HAND, Handedness::Right, TOUCH, value);
            self.handler.handle_input(&ev, &mut self.obj)
        }

        fn pad(&mut self, x: f32, y: f32) -> Option<ManipulationGesture> {
            let ev = InputEvent::dual_axis(HAND, Handedness::Right, PAD, Vec2::new(x, y));
            self.handler.handle_input(&ev, &mut self.obj)
        }
    }

    #[test]
    fn press_and_hold_grabs_until_release() {
        let mut h = Harness::new(SelectMode::PressAndHold);
        assert_eq!(
            h.select(HAND, true),
            Some(ManipulationGesture::HoldBegan { source: HAND })
        );
        assert!(h.handler.is_held());
        assert!(!h.obj.colliders_active);
        assert_eq!(h.select(HAND, false), Some(ManipulationGesture::HoldEnded));
        assert!(!h.handler.is_held());
        assert!(h.obj.colliders_active);
    }

    #[test]
    fn toggle_flips_on_release() {
        let mut h = Harness::new(SelectMode::Toggle);
        assert_eq!(h.select(HAND, true), None);
        assert!(!h.handler.is_held());
        assert!(h.select(HAND, false).is_some());
        assert!(h.handler.is_held());
        assert_eq!(h.select(HAND, true), None);
        assert_eq!(h.select(HAND, false), Some(ManipulationGesture::HoldEnded));
        assert!(!h.handler.is_held());
    }

    #[test]
    fn other_source_cannot_release_or_drive() {
        let mut h = Harness::held();
        assert_eq!(h.select(OTHER, false), None);
        assert!(h.handler.is_held());
        let ev = InputEvent::dual_axis(OTHER, Handedness::Left, PAD, Vec2::new(0.0, 1.0));
        assert_eq!(h.handler.handle_input(&ev, &mut h.obj), None);
        assert_eq!(h.handler.primary_source(), Some(HAND));
    }

    #[test]
    fn cancel_ends_hold() {
        let mut h = Harness::held();
        let ev = InputEvent::digital(HAND, Handedness::Right, CANCEL, true);
        assert_eq!(
            h.handler.handle_input(&ev, &mut h.obj),
            Some(ManipulationGesture::HoldEnded)
        );
        assert!(!h.handler.is_held());
    }

    #[test]
    fn follow_only_moves_while_held() {
        let mut h = Harness::new(SelectMode::PressAndHold);
        assert!(!h.handler.follow(Vec3::ONE, &mut h.obj));
        assert_eq!(h.obj.transform.position, Vec3::ZERO);
        h.select(HAND, true);
        assert!(h.handler.follow(Vec3::ONE, &mut h.obj));
        assert_eq!(h.obj.transform.position, Vec3::ONE);
    }

    #[test]
    fn circular_motion_rotates() {
        let mut h = Harness::held();
        assert_eq!(h.pad(0.0, 1.0), None);
        let Some(ManipulationGesture::Rotated { degrees }) = h.pad(-0.5, 0.866) else {
            panic!("expected rotation");
        };
        assert!((degrees + 30.0).abs() < 0.1);
        assert!(h.handler.is_rotating());
        assert!((h.obj.yaw() + 30.0).abs() < 0.1);
    }

    #[test]
    fn other_dual_axis_actions_do_not_disturb_rotation() {
        let mut h = Harness::held();
        h.pad(0.0, 1.0);
        let thumbstick =
            InputEvent::dual_axis(HAND, Handedness::Right, InputAction(99), Vec2::new(1.0, 0.0));
        assert_eq!(h.handler.handle_input(&thumbstick, &mut h.obj), None);
        let Some(ManipulationGesture::Rotated { degrees }) = h.pad(-0.5, 0.866) else {
            panic!("expected rotation");
        };
        assert!((degrees + 30.0).abs() < 0.1);
        assert!((h.obj.yaw() + 30.0).abs() < 0.1);
    }

    #[test]
    fn small_motion_does_not_start_rotation() {
        let mut h = Harness::held();
        h.pad(0.0, 1.0);
        assert_eq!(h.pad(-0.1, 0.995), None);
        assert!(!h.handler.is_rotating());
    }

    #[test]
    fn rotation_continues_below_activation_once_started() {
        let mut h = Harness::held();
        h.pad(0.0, 1.0);
        h.pad(-0.5, 0.866);
        assert!(matches!(
            h.pad(-0.6, 0.8),
            Some(ManipulationGesture::Rotated { .. })
        ));
    }

    #[test]
    fn lifting_forgets_last_reading() {
        let mut h = Harness::held();
        h.pad(0.0, 1.0);
        h.touch(0.0);
        assert_eq!(h.pad(-1.0, 0.0), None);
        assert!(!h.handler.is_rotating());
    }

    #[test]
    fn rotation_then_press_in_scale_zone_does_not_scale() {
        let mut h = Harness::held();
        h.pad(0.0, 1.0);
        h.pad(-0.5, 0.866);
        assert!(h.handler.is_rotating());
        h.touch(0.8);
        assert!(!h.handler.is_touch_pressed());
        let g = h.pad(-0.6, 0.0);
        assert!(!matches!(g, Some(ManipulationGesture::Scaled { .. })));
        assert_eq!(h.obj.uniform_scale(), 1.0);
    }

    #[test]
    fn pressed_left_shrinks_right_grows() {
        let mut h = Harness::held();
        h.obj.set_uniform_scale(0.5);
        h.touch(0.5);
        assert_eq!(h.pad(-0.6, 0.0), Some(ManipulationGesture::Scaled { scale: 0.25 }));
        assert_eq!(h.pad(0.6, 0.0), Some(ManipulationGesture::Scaled { scale: 0.5 }));
        assert_eq!(h.obj.uniform_scale(), 0.5);
    }

    #[test]
    fn scale_stays_inside_constraints() {
        let mut h = Harness::held();
        h.touch(0.5);
        // 1.0 / 0.5 = 2.0 is past the max of 1.0.
        assert_eq!(h.pad(0.6, 0.0), Some(ManipulationGesture::Scaled { scale: 1.0 }));
        h.obj.set_uniform_scale(0.015);
        assert_eq!(h.pad(-0.6, 0.0), Some(ManipulationGesture::Scaled { scale: 0.015 }));
    }

    #[test]
    fn pressed_up_pushes_down_pulls() {
        let mut h = Harness::held();
        h.touch(0.5);
        h.pad(0.0, 0.6);
        assert!((h.obj.pointer_extent - 2.01).abs() < 1e-5);
        h.pad(0.0, -0.6);
        assert!((h.obj.pointer_extent - 2.0).abs() < 1e-5);
    }

    #[test]
    fn nudge_starts_from_ray_hit_when_closer() {
        let mut h = Harness::held();
        h.obj.ray_distance = 1.0;
        h.touch(0.5);
        let Some(ManipulationGesture::Nudged { extent }) = h.pad(0.0, -0.6) else {
            panic!("expected nudge");
        };
        assert!((extent - 0.99).abs() < 1e-5);
    }

    #[test]
    fn nudge_stays_inside_constraints() {
        let mut h = Harness::held();
        h.obj.pointer_extent = 0.255;
        h.touch(0.5);
        assert_eq!(h.pad(0.0, -0.6), Some(ManipulationGesture::Nudged { extent: 0.255 }));
    }

    #[test]
    fn diagonal_is_ambiguous() {
        let mut h = Harness::held();
        h.touch(0.5);
        assert_eq!(h.pad(0.6, 0.6), None);
        assert_eq!(h.obj.uniform_scale(), 1.0);
        assert_eq!(h.obj.pointer_extent, 2.0);
    }

    #[test]
    fn centre_of_pad_does_nothing() {
        let mut h = Harness::held();
        h.touch(0.5);
        assert_eq!(h.pad(0.1, 0.1), None);
    }

    #[test]
    fn release_of_press_returns_to_rotation() {
        let mut h = Harness::held();
        h.touch(0.5);
        assert!(h.handler.is_touch_pressed());
        h.touch(0.1);
        assert!(!h.handler.is_touch_pressed());
        assert_eq!(h.pad(0.6, 0.0), None);
    }

    #[test]
    fn ending_hold_resets_gesture_state() {
        let mut h = Harness::held();
        h.pad(0.0, 1.0);
        h.pad(-0.5, 0.866);
        h.handler.stop(&mut h.obj);
        assert!(!h.handler.is_held());
        assert!(!h.handler.is_rotating());
        h.select(HAND, true);
        h.touch(0.5);
        assert!(h.handler.is_touch_pressed());
    }

    #[test]
    fn signed_angle_direction() {
        assert!((signed_angle(Vec2::X, Vec2::Y) - 90.0).abs() < 1e-4);
        assert!((signed_angle(Vec2::Y, Vec2::X) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = config(SelectMode::Toggle);
        cfg.press_threshold = 2.0;
        assert!(ManipulationHandler::new(cfg).is_err());
    }
}
