use glam::Vec3;
use mrkit_common::HotSpotId;
use serde::{Deserialize, Serialize};

/// A designated teleport target, owned by the scene.
///
/// The raycaster reports the hot-spot it hit; pointers and events carry a
/// copy of the descriptor for the length of one gesture and never keep it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotSpot {
    pub id: HotSpotId,
    /// Where the player lands when teleporting to this hot-spot.
    pub position: Vec3,
    /// Inactive hot-spots classify like ordinary surfaces.
    pub is_valid: bool,
    /// Force the player to face `target_orientation` after landing.
    pub override_orientation: bool,
    /// Yaw in degrees, clockwise from -Z.
    pub target_orientation: f32,
}

impl HotSpot {
    pub fn new(id: HotSpotId, position: Vec3) -> Self {
        Self {
            id,
            position,
            is_valid: true,
            override_orientation: false,
            target_orientation: 0.0,
        }
    }

    /// Builder: force the landing yaw.
    pub fn facing(mut self, degrees: f32) -> Self {
        self.override_orientation = true;
        self.target_orientation = degrees;
        self
    }

    /// The forced landing yaw, if any.
    pub fn orientation_override(&self) -> Option<f32> {
        self.override_orientation.then_some(self.target_orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_hot_spot_has_no_override() {
        let hs = HotSpot::new(HotSpotId(1), Vec3::ZERO);
        assert!(hs.is_valid);
        assert_eq!(hs.orientation_override(), None);
    }

    #[test]
    fn facing_sets_override() {
        let hs = HotSpot::new(HotSpotId(1), Vec3::ZERO).facing(90.0);
        assert_eq!(hs.orientation_override(), Some(90.0));
    }
}
