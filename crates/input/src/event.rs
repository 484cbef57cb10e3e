use glam::Vec2;
use mrkit_common::{Handedness, InputAction, InputSourceId};
use serde::{Deserialize, Serialize};

/// The payload of one input sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputData {
    /// A button went down (`true`) or up (`false`).
    Digital(bool),
    /// A trigger or touchpad press in `0..=1`.
    SingleAxis(f32),
    /// A thumbstick or touchpad position, each axis in `-1..=1`.
    DualAxis(Vec2),
}

/// One input sample, delivered on the input-poll tick.
///
/// Handlers never see raw device state; the host maps device readings to
/// events tagged with the source, hand and action that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub source: InputSourceId,
    pub handedness: Handedness,
    pub action: InputAction,
    pub data: InputData,
}

impl InputEvent {
    pub fn digital(
        source: InputSourceId,
        handedness: Handedness,
        action: InputAction,
        pressed: bool,
    ) -> Self {
        Self {
            source,
            handedness,
            action,
            data: InputData::Digital(pressed),
        }
    }

    pub fn single_axis(
        source: InputSourceId,
        handedness: Handedness,
        action: InputAction,
        value: f32,
    ) -> Self {
        Self {
            source,
            handedness,
            action,
            data: InputData::SingleAxis(value),
        }
    }

    pub fn dual_axis(
        source: InputSourceId,
        handedness: Handedness,
        action: InputAction,
        position: Vec2,
    ) -> Self {
        Self {
            source,
            handedness,
            action,
            data: InputData::DualAxis(position),
        }
    }

    /// Whether this is a digital press (not a release, not an axis).
    pub fn is_press(&self) -> bool {
        matches!(self.data, InputData::Digital(true))
    }

    /// Whether this is a digital release.
    pub fn is_release(&self) -> bool {
        matches!(self.data, InputData::Digital(false))
    }
}
