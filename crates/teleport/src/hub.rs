//! The teleport system: owns the pointers of one player, broadcasts their
//! events to each other and to handlers, and moves the camera rig.
//!
//! # Invariants
//! - Events raised while handling one input are broadcast before the next
//!   pointer sees that input.
//! - At most one pointer owns the active request.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec3;
use mrkit_common::{InputSourceId, PointerId};
use mrkit_input::InputEvent;

use crate::event::{TeleportEvent, TeleportEventData, TeleportHandler, dispatch};
use crate::line::RaycastResult;
use crate::pointer::{LineFeedback, PointerContext, PointerTransition, TeleportPointer};
use crate::rig::CameraRig;
use crate::validation::TeleportValidationResult;

/// Handle returned by `TeleportHub::register_handler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u32);

#[derive(Default)]
pub struct TeleportHub {
    pointers: BTreeMap<PointerId, TeleportPointer>,
    handlers: Vec<(HandlerId, Box<dyn TeleportHandler>)>,
    next_handler: u32,
    camera_rig: Option<Box<dyn CameraRig>>,
    active_request: Option<PointerId>,
    /// Append-only log of every event broadcast.
    event_log: Vec<TeleportEvent>,
}

impl TeleportHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera_rig(mut self, rig: Box<dyn CameraRig>) -> Self {
        self.camera_rig = Some(rig);
        self
    }

    pub fn camera_rig(&self) -> Option<&dyn CameraRig> {
        self.camera_rig.as_deref()
    }

    /// Start a pointer and register it. Returns its id.
    pub fn add_pointer(&mut self, mut pointer: TeleportPointer) -> PointerId {
        let id = pointer.id();
        pointer.start();
        // A pointer joining mid-request is suppressed like the others.
        if let Some(owner) = self.active_request {
            pointer.on_teleport_event(&TeleportEvent::Request(TeleportEventData::new(owner)));
        }
        self.pointers.insert(id, pointer);
        id
    }

    /// Stop and unregister a pointer, canceling its gesture.
    pub fn remove_pointer(&mut self, id: PointerId) -> Option<TeleportPointer> {
        let mut pointer = self.pointers.remove(&id)?;
        let mut outbox: Vec<TeleportEvent> = Vec::new();
        pointer.stop(Some(&mut outbox));
        self.publish(outbox);
        Some(pointer)
    }

    /// An input source disappeared: stop every pointer bound to it.
    pub fn source_lost(&mut self, source: InputSourceId) {
        let ids: Vec<PointerId> = self
            .pointers
            .iter()
            .filter(|(_, p)| p.binding().source == source)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            let mut outbox: Vec<TeleportEvent> = Vec::new();
            if let Some(pointer) = self.pointers.get_mut(&id) {
                tracing::debug!(pointer = ?id, ?source, "input source lost");
                pointer.stop(Some(&mut outbox));
            }
            self.publish(outbox);
        }
    }

    pub fn pointer(&self, id: PointerId) -> Option<&TeleportPointer> {
        self.pointers.get(&id)
    }

    pub fn pointer_mut(&mut self, id: PointerId) -> Option<&mut TeleportPointer> {
        self.pointers.get_mut(&id)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// The pointer that owns the active request, if any.
    pub fn active_request(&self) -> Option<PointerId> {
        self.active_request
    }

    pub fn register_handler(&mut self, handler: Box<dyn TeleportHandler>) -> HandlerId {
        let id = HandlerId(self.next_handler);
        self.next_handler += 1;
        self.handlers.push((id, handler));
        id
    }

    pub fn unregister_handler(&mut self, id: HandlerId) -> Option<Box<dyn TeleportHandler>> {
        let index = self.handlers.iter().position(|(h, _)| *h == id)?;
        Some(self.handlers.remove(index).1)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[TeleportEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<TeleportEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Input-poll tick: offer one sample to every pointer in id order.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<(PointerId, PointerTransition)> {
        let _span = tracing::info_span!("teleport_input").entered();
        let ids: Vec<PointerId> = self.pointers.keys().copied().collect();
        let mut transitions = Vec::new();

        for id in ids {
            let mut outbox: Vec<TeleportEvent> = Vec::new();
            let transition = match self.pointers.get_mut(&id) {
                Some(pointer) => {
                    let mut ctx = PointerContext {
                        teleport: Some(&mut outbox),
                        camera_rig: self
                            .camera_rig
                            .as_deref_mut()
                            .map(|rig| rig as &mut dyn CameraRig),
                    };
                    pointer.handle_input(event, &mut ctx)
                }
                None => None,
            };
            self.publish(outbox);
            if let Some(t) = transition {
                transitions.push((id, t));
            }
        }
        transitions
    }

    /// Render tick for one pointer: classify the raycaster's result.
    pub fn render_tick(
        &mut self,
        id: PointerId,
        hit: Option<&RaycastResult>,
    ) -> Option<LineFeedback> {
        let _span = tracing::info_span!("teleport_render").entered();
        self.pointers.get_mut(&id).map(|p| p.post_raycast(hit))
    }

    fn publish(&mut self, events: Vec<TeleportEvent>) {
        let mut queue: VecDeque<TeleportEvent> = events.into();

        while let Some(event) = queue.pop_front() {
            let owner = event.pointer();
            match event {
                TeleportEvent::Request(_) => {
                    if self.active_request.is_some_and(|active| active != owner) {
                        tracing::warn!(pointer = ?owner, "request dropped; another request is active");
                        continue;
                    }
                    self.active_request = Some(owner);
                }
                TeleportEvent::Started(_) | TeleportEvent::Canceled(_) => {
                    if self.active_request.is_some_and(|active| active != owner) {
                        tracing::warn!(pointer = ?owner, kind = event.kind(), "event dropped; pointer does not own the request");
                        continue;
                    }
                }
                TeleportEvent::Completed(_) => {}
            }

            self.broadcast(&event);

            match event {
                TeleportEvent::Started(data) => {
                    if let Some(rig) = self.camera_rig.as_deref_mut() {
                        teleport_rig(rig, &data);
                    }
                    queue.push_back(TeleportEvent::Completed(data));
                }
                TeleportEvent::Completed(_) | TeleportEvent::Canceled(_) => {
                    self.active_request = None;
                }
                TeleportEvent::Request(_) => {}
            }
        }
    }

    fn broadcast(&mut self, event: &TeleportEvent) {
        tracing::debug!(kind = event.kind(), pointer = ?event.pointer(), "teleport event");
        for pointer in self.pointers.values_mut() {
            pointer.on_teleport_event(event);
        }
        for (_, handler) in &mut self.handlers {
            dispatch(handler.as_mut(), event);
        }
        self.event_log.push(*event);
    }
}

/// Move the rig so the camera lands on the target, feet on the target
/// height. A hot-spot only decides the landing point and facing when the
/// hit validated as a hot-spot; otherwise the hit point is used.
fn teleport_rig(rig: &mut dyn CameraRig, data: &TeleportEventData) {
    let (target, yaw) = match data.hot_spot {
        Some(hs) if data.validation == TeleportValidationResult::HotSpot => {
            (Some(hs.position), hs.orientation_override())
        }
        _ => (data.target, None),
    };
    let Some(target) = target else {
        tracing::debug!(pointer = ?data.pointer, "started without a target; rig not moved");
        return;
    };

    if let Some(yaw) = yaw {
        let pivot = rig.camera_position();
        let turn = yaw - rig.camera_yaw();
        rig.rotate_around(pivot, Vec3::Y, turn);
    }

    let camera = rig.camera_position();
    let playspace = rig.playspace_position();
    let landed = Vec3::new(
        playspace.x + target.x - camera.x,
        target.y,
        playspace.z + target.z - camera.z,
    );
    rig.set_playspace_position(landed);
    tracing::debug!(pointer = ?data.pointer, ?landed, "camera rig teleported");
}
