use glam::Vec3;
use mrkit_common::PointerId;
use serde::{Deserialize, Serialize};

use crate::hotspot::HotSpot;
use crate::validation::TeleportValidationResult;

/// Payload carried by every teleport event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeleportEventData {
    /// The pointer that owns the gesture.
    pub pointer: PointerId,
    /// The hot-spot under the line. Always `None` on Request: targets are
    /// only classified while a request is active.
    pub hot_spot: Option<HotSpot>,
    /// Validation result when the event was raised.
    pub validation: TeleportValidationResult,
    /// Last teleportable hit point, if any.
    pub target: Option<Vec3>,
}

impl TeleportEventData {
    pub fn new(pointer: PointerId) -> Self {
        Self {
            pointer,
            hot_spot: None,
            validation: TeleportValidationResult::None,
            target: None,
        }
    }
}

/// Events broadcast by the teleport system to every pointer and handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TeleportEvent {
    /// A pointer began a teleport gesture.
    Request(TeleportEventData),
    /// A gesture was committed; the rig is about to move.
    Started(TeleportEventData),
    /// The rig has been moved.
    Completed(TeleportEventData),
    /// A gesture ended without teleporting.
    Canceled(TeleportEventData),
}

impl TeleportEvent {
    pub fn data(&self) -> &TeleportEventData {
        match self {
            Self::Request(d) | Self::Started(d) | Self::Completed(d) | Self::Canceled(d) => d,
        }
    }

    pub fn pointer(&self) -> PointerId {
        self.data().pointer
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Started(_) => "started",
            Self::Completed(_) => "completed",
            Self::Canceled(_) => "canceled",
        }
    }
}

/// Where pointers raise teleport events.
pub trait TeleportSystem {
    fn raise_request(&mut self, data: TeleportEventData);
    fn raise_started(&mut self, data: TeleportEventData);
    fn raise_canceled(&mut self, data: TeleportEventData);
}

/// A plain event list is a teleport system: it records what was raised.
impl TeleportSystem for Vec<TeleportEvent> {
    fn raise_request(&mut self, data: TeleportEventData) {
        self.push(TeleportEvent::Request(data));
    }

    fn raise_started(&mut self, data: TeleportEventData) {
        self.push(TeleportEvent::Started(data));
    }

    fn raise_canceled(&mut self, data: TeleportEventData) {
        self.push(TeleportEvent::Canceled(data));
    }
}

/// Observer of teleport events. Every method defaults to a no-op.
pub trait TeleportHandler {
    fn on_teleport_request(&mut self, _data: &TeleportEventData) {}
    fn on_teleport_started(&mut self, _data: &TeleportEventData) {}
    fn on_teleport_completed(&mut self, _data: &TeleportEventData) {}
    fn on_teleport_canceled(&mut self, _data: &TeleportEventData) {}
}

/// Route an event to the matching handler method.
pub fn dispatch(handler: &mut dyn TeleportHandler, event: &TeleportEvent) {
    match event {
        TeleportEvent::Request(d) => handler.on_teleport_request(d),
        TeleportEvent::Started(d) => handler.on_teleport_started(d),
        TeleportEvent::Completed(d) => handler.on_teleport_completed(d),
        TeleportEvent::Canceled(d) => handler.on_teleport_canceled(d),
    }
}
