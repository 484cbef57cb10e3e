//! The teleport pointer: turns raw input into the request / commit / cancel
//! protocol of the teleport system.
//!
//! # Invariants
//! - At most one gesture is active per pointer.
//! - A gesture ends in exactly one of Started or Canceled.
//! - While another pointer's request is active, this pointer ignores
//!   press-side input.

use std::rc::Rc;

use glam::{Vec2, Vec3};
use mrkit_common::{Handedness, InputAction, InputSourceId, PointerId};
use mrkit_input::{InputData, InputEvent};
use serde::{Deserialize, Serialize};

use crate::angle::{StickBand, classify_angle, is_neutral, stick_angle};
use crate::config::{TeleportConfig, TeleportConfigError};
use crate::event::{TeleportEvent, TeleportEventData, TeleportSystem};
use crate::hotspot::HotSpot;
use crate::line::{ParabolicArc, RayStep, RaycastResult, clear_world_length, normalized_length};
use crate::rig::CameraRig;
use crate::validation::{LineGradient, TeleportValidationResult, ValidationProvider, line_gradient};

/// Which input a pointer listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerBinding {
    pub source: InputSourceId,
    pub handedness: Handedness,
    pub teleport_action: InputAction,
    /// Digital press on this action cancels an active gesture.
    #[serde(default)]
    pub cancel_action: InputAction,
}

/// Gesture phase. Committing and Canceling are passed through within the
/// input that ends a gesture; between inputs a pointer is Idle or Requesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeleportPhase {
    Idle,
    Requesting,
    Committing,
    Canceling,
}

/// What one input did to a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerTransition {
    /// Idle → Requesting; a Request was raised.
    Requested,
    /// Requesting → Committing → Idle; Started was raised.
    Committed,
    /// Requesting → Canceling → Idle; Canceled was raised.
    Canceled,
    /// The camera rig turned by `degrees`.
    Rotated { degrees: f32 },
    /// The camera rig moved by `offset`.
    Strafed { offset: Vec3 },
}

/// Collaborators lent to the pointer for one input tick.
#[derive(Default)]
pub struct PointerContext<'a> {
    pub teleport: Option<&'a mut dyn TeleportSystem>,
    pub camera_rig: Option<&'a mut dyn CameraRig>,
}

/// Line and cursor state produced by a render tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFeedback {
    pub line_enabled: bool,
    pub gradient: LineGradient,
    pub cursor_visible: bool,
    /// Normalized length at which the line is cut off.
    pub end_clamp: f32,
    /// World length of the clear part of the line.
    pub clear_length: f32,
}

impl LineFeedback {
    pub fn hidden() -> Self {
        Self {
            line_enabled: false,
            gradient: LineGradient::NoTarget,
            cursor_visible: false,
            end_clamp: 1.0,
            clear_length: 0.0,
        }
    }
}

pub struct TeleportPointer {
    id: PointerId,
    binding: PointerBinding,
    config: TeleportConfig,
    validation_provider: Option<Rc<dyn ValidationProvider>>,
    running: bool,
    phase: TeleportPhase,
    suppressed: bool,
    can_move: bool,
    validation: TeleportValidationResult,
    hot_spot: Option<HotSpot>,
    target: Option<Vec3>,
    stick: Vec2,
    orientation: f32,
    rays: Vec<RayStep>,
}

impl TeleportPointer {
    /// Build a pointer. The configuration is checked once here and frozen.
    pub fn new(
        binding: PointerBinding,
        config: TeleportConfig,
        validation_provider: Option<Rc<dyn ValidationProvider>>,
    ) -> Result<Self, TeleportConfigError> {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "rejected teleport pointer configuration");
            return Err(e);
        }
        Ok(Self {
            id: PointerId::new(),
            binding,
            config,
            validation_provider,
            running: false,
            phase: TeleportPhase::Idle,
            suppressed: false,
            can_move: false,
            validation: TeleportValidationResult::None,
            hot_spot: None,
            target: None,
            stick: Vec2::ZERO,
            orientation: 0.0,
            rays: Vec::new(),
        })
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn binding(&self) -> &PointerBinding {
        &self.binding
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    pub fn phase(&self) -> TeleportPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a gesture owned by this pointer is active.
    pub fn is_requesting(&self) -> bool {
        self.phase == TeleportPhase::Requesting
    }

    /// Whether another pointer's request currently suppresses this one.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    /// Line and cursor are live only while this pointer owns the gesture.
    pub fn is_interaction_enabled(&self) -> bool {
        !self.suppressed && self.is_requesting()
    }

    /// Result of the last render tick.
    pub fn validation(&self) -> TeleportValidationResult {
        self.validation
    }

    pub fn hot_spot(&self) -> Option<&HotSpot> {
        self.hot_spot.as_ref()
    }

    /// Last stick position seen on the teleport action.
    pub fn stick(&self) -> Vec2 {
        self.stick
    }

    /// Facing the player will have after landing: the hot-spot's forced
    /// yaw when aiming at one, otherwise the stick angle.
    pub fn pointer_orientation(&self) -> f32 {
        match self.hot_spot.and_then(|hs| hs.orientation_override()) {
            Some(yaw) if self.validation == TeleportValidationResult::HotSpot => yaw,
            _ => self.orientation,
        }
    }

    /// Begin receiving input.
    pub fn start(&mut self) {
        self.running = true;
        self.can_move = true;
        tracing::debug!(pointer = ?self.id, "teleport pointer started");
    }

    /// Stop receiving input. An active gesture is canceled.
    pub fn stop(&mut self, teleport: Option<&mut dyn TeleportSystem>) -> Option<PointerTransition> {
        let transition = if self.is_requesting() {
            self.phase = TeleportPhase::Canceling;
            if let Some(system) = teleport {
                system.raise_canceled(self.event_data());
            }
            self.settle();
            Some(PointerTransition::Canceled)
        } else {
            None
        };
        self.running = false;
        self.suppressed = false;
        self.can_move = false;
        tracing::debug!(pointer = ?self.id, "teleport pointer stopped");
        transition
    }

    /// Handle one input sample. Samples from other sources, hands or
    /// actions are ignored, as is everything when the teleport system or
    /// validation provider is missing.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        ctx: &mut PointerContext<'_>,
    ) -> Option<PointerTransition> {
        if !self.running
            || event.source != self.binding.source
            || event.handedness != self.binding.handedness
        {
            return None;
        }
        let Some(system) = ctx.teleport.as_deref_mut() else {
            tracing::trace!(pointer = ?self.id, "no teleport system; input ignored");
            return None;
        };
        if self.validation_provider.is_none() {
            tracing::trace!(pointer = ?self.id, "no validation provider; input ignored");
            return None;
        }

        if !self.binding.cancel_action.is_none() && event.action == self.binding.cancel_action {
            if event.is_press() && self.is_requesting() {
                return Some(self.finish(system, false));
            }
            return None;
        }
        if event.action != self.binding.teleport_action {
            return None;
        }

        match event.data {
            InputData::Digital(false) => self.process_digital(false, system),
            // Neutral stick samples are dropped too, so a consumed can_move
            // stays consumed until a neutral sample after suppression lifts.
            _ if self.suppressed => {
                tracing::trace!(pointer = ?self.id, "suppressed; input ignored");
                None
            }
            InputData::Digital(true) => self.process_digital(true, system),
            InputData::SingleAxis(value) => {
                self.process_digital(value > self.config.input_threshold, system)
            }
            InputData::DualAxis(position) => {
                self.process_dual_axis(position, system, ctx.camera_rig.as_deref_mut())
            }
        }
    }

    /// React to an event broadcast by the teleport system.
    pub fn on_teleport_event(&mut self, event: &TeleportEvent) {
        match event {
            TeleportEvent::Request(data) => {
                self.suppressed = data.pointer != self.id;
                if self.suppressed {
                    tracing::debug!(pointer = ?self.id, owner = ?data.pointer, "suppressed by request");
                }
            }
            TeleportEvent::Started(_) => {}
            TeleportEvent::Completed(_) | TeleportEvent::Canceled(_) => {
                self.suppressed = false;
            }
        }
    }

    /// Cut the arc into the ray steps the raycaster should test this frame.
    pub fn pre_raycast(&mut self, arc: &ParabolicArc) -> &[RayStep] {
        self.rays = arc.ray_steps(self.config.line_cast_resolution);
        &self.rays
    }

    /// Classify the raycaster's result. Runs once per render tick and must
    /// precede the input that commits or cancels.
    pub fn post_raycast(&mut self, hit: Option<&RaycastResult>) -> LineFeedback {
        self.validation = TeleportValidationResult::None;

        if !self.running || !self.is_interaction_enabled() {
            self.target = None;
            return LineFeedback::hidden();
        }

        let Some(hit) = hit.filter(|h| h.is_hit()) else {
            self.hot_spot = None;
            self.target = None;
            return LineFeedback {
                line_enabled: true,
                gradient: line_gradient(self.validation),
                cursor_visible: false,
                end_clamp: 1.0,
                clear_length: 0.0,
            };
        };

        self.hot_spot = hit.hot_spot;
        if let Some(provider) = &self.validation_provider {
            self.validation = provider.classify(hit, self.hot_spot.as_ref());
        }
        let teleportable = self.validation.is_teleportable();
        self.target = teleportable.then_some(hit.point);

        let clear_length = clear_world_length(&self.rays, hit);
        tracing::trace!(pointer = ?self.id, validation = ?self.validation, clear_length, "validated target");

        LineFeedback {
            line_enabled: true,
            gradient: line_gradient(self.validation),
            cursor_visible: teleportable,
            end_clamp: normalized_length(&self.rays, clear_length),
            clear_length,
        }
    }

    fn process_digital(
        &mut self,
        pressed: bool,
        system: &mut dyn TeleportSystem,
    ) -> Option<PointerTransition> {
        match (pressed, self.is_requesting()) {
            (true, false) => Some(self.begin(system)),
            (false, true) => {
                let commit = self.validation.is_teleportable();
                Some(self.finish(system, commit))
            }
            _ => None,
        }
    }

    fn process_dual_axis(
        &mut self,
        position: Vec2,
        system: &mut dyn TeleportSystem,
        rig: Option<&mut (dyn CameraRig + '_)>,
    ) -> Option<PointerTransition> {
        self.stick = position;

        if is_neutral(position, self.config.input_threshold) {
            self.can_move = true;
            if !self.is_requesting() {
                return None;
            }
            let commit = self.validation.is_teleportable();
            return Some(self.finish(system, commit));
        }

        let angle = stick_angle(position, self.config.angle_offset);
        self.orientation = angle;
        if self.is_requesting() {
            return None;
        }

        match classify_angle(angle, &self.config) {
            StickBand::Teleport => Some(self.begin(system)),
            StickBand::Rotate if self.can_move => {
                let Some(rig) = rig else {
                    tracing::warn!(pointer = ?self.id, "rotate needs a camera rig");
                    return None;
                };
                self.can_move = false;
                let degrees = if angle >= 0.0 {
                    self.config.rotation_amount
                } else {
                    -self.config.rotation_amount
                };
                let pivot = rig.camera_position();
                rig.rotate_around(pivot, Vec3::Y, degrees);
                tracing::debug!(pointer = ?self.id, angle, degrees, "rotated camera rig");
                Some(PointerTransition::Rotated { degrees })
            }
            StickBand::BackStrafe if self.can_move => {
                let Some(rig) = rig else {
                    tracing::warn!(pointer = ?self.id, "strafe needs a camera rig");
                    return None;
                };
                self.can_move = false;
                let forward = rig.camera_forward();
                let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
                let offset = -flat * self.config.strafe_amount;
                let position = rig.playspace_position();
                rig.set_playspace_position(position + offset);
                tracing::debug!(pointer = ?self.id, angle, ?offset, "strafed camera rig");
                Some(PointerTransition::Strafed { offset })
            }
            _ => None,
        }
    }

    /// Raised from Idle, where nothing has been classified yet, so the
    /// Request never carries a hot-spot.
    fn begin(&mut self, system: &mut dyn TeleportSystem) -> PointerTransition {
        self.phase = TeleportPhase::Requesting;
        tracing::debug!(pointer = ?self.id, hot_spot = ?self.hot_spot.map(|h| h.id), "teleport requested");
        system.raise_request(self.event_data());
        PointerTransition::Requested
    }

    fn finish(&mut self, system: &mut dyn TeleportSystem, commit: bool) -> PointerTransition {
        let data = self.event_data();
        let transition = if commit {
            self.phase = TeleportPhase::Committing;
            system.raise_started(data);
            PointerTransition::Committed
        } else {
            self.phase = TeleportPhase::Canceling;
            system.raise_canceled(data);
            PointerTransition::Canceled
        };
        tracing::debug!(pointer = ?self.id, phase = ?self.phase, validation = ?self.validation, "teleport gesture ended");
        self.settle();
        transition
    }

    fn settle(&mut self) {
        self.phase = TeleportPhase::Idle;
        self.validation = TeleportValidationResult::None;
        self.hot_spot = None;
        self.target = None;
    }

    fn event_data(&self) -> TeleportEventData {
        TeleportEventData {
            pointer: self.id,
            hot_spot: self.hot_spot,
            validation: self.validation,
            target: self.target,
        }
    }
}
