use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a pointer. Distinguishes concurrently active pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub Uuid);

impl PointerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PointerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-assigned id of a physical input source (a controller, a hand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputSourceId(pub u32);

/// Host-assigned id of a logical input action (select, teleport, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputAction(pub u32);

impl InputAction {
    /// The unbound action. Never matches a configured action.
    pub const NONE: Self = Self(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl Default for InputAction {
    fn default() -> Self {
        Self::NONE
    }
}

/// Id of an externally owned teleport hot-spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HotSpotId(pub u32);

/// Which hand an input source or pointer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    None,
    Left,
    Right,
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Right-handed, Y-up: forward is -Z in local space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Map a point from local space into the space this transform lives in.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (local * self.scale)
    }

    /// Rotate about `axis` through `pivot`. Positive degrees turn clockwise
    /// when looking down the axis (a right turn about +Y).
    pub fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, degrees: f32) {
        let q = Quat::from_axis_angle(axis.normalize_or_zero(), -degrees.to_radians());
        self.position = pivot + q * (self.position - pivot);
        self.rotation = (q * self.rotation).normalize();
    }
}
