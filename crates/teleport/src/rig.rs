use glam::Vec3;
use mrkit_common::Transform;

/// The camera rig the rotate/strafe bands and committed teleports move.
///
/// The playspace is the tracked-space origin on the floor; the camera is the
/// head inside it. Moving the rig means moving the playspace.
pub trait CameraRig {
    fn camera_position(&self) -> Vec3;
    fn camera_forward(&self) -> Vec3;
    fn playspace_position(&self) -> Vec3;
    fn set_playspace_position(&mut self, position: Vec3);
    /// Rotate the playspace about `axis` through `pivot`. Positive degrees
    /// turn right about +Y.
    fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, degrees: f32);

    /// Camera yaw in degrees, clockwise from -Z.
    fn camera_yaw(&self) -> f32 {
        let f = self.camera_forward();
        f.x.atan2(-f.z).to_degrees()
    }
}

/// A camera rig backed by two transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayspaceRig {
    /// Playspace in world space.
    pub playspace: Transform,
    /// Camera relative to the playspace.
    pub camera: Transform,
}

impl PlayspaceRig {
    /// A rig standing at `position` with the head `eye_height` above the floor.
    pub fn standing(position: Vec3, eye_height: f32) -> Self {
        Self {
            playspace: Transform {
                position,
                ..Transform::default()
            },
            camera: Transform {
                position: Vec3::new(0.0, eye_height, 0.0),
                ..Transform::default()
            },
        }
    }
}

impl CameraRig for PlayspaceRig {
    fn camera_position(&self) -> Vec3 {
        self.playspace.position + self.playspace.rotation * self.camera.position
    }

    fn camera_forward(&self) -> Vec3 {
        self.playspace.rotation * self.camera.forward()
    }

    fn playspace_position(&self) -> Vec3 {
        self.playspace.position
    }

    fn set_playspace_position(&mut self, position: Vec3) {
        self.playspace.position = position;
    }

    fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, degrees: f32) {
        self.playspace.rotate_around(pivot, axis, degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_rig_puts_camera_above_playspace() {
        let rig = PlayspaceRig::standing(Vec3::new(1.0, 0.0, 2.0), 1.6);
        assert!(rig.camera_position().abs_diff_eq(Vec3::new(1.0, 1.6, 2.0), 1e-6));
        assert!(rig.camera_forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(rig.camera_yaw().abs() < 1e-4);
    }

    #[test]
    fn rotating_about_camera_keeps_camera_in_place() {
        let mut rig = PlayspaceRig::standing(Vec3::ZERO, 1.6);
        rig.camera.position.x = 0.3;
        let before = rig.camera_position();
        rig.rotate_around(before, Vec3::Y, 90.0);
        assert!(rig.camera_position().abs_diff_eq(before, 1e-5));
        assert!(rig.camera_forward().abs_diff_eq(Vec3::X, 1e-5));
        assert!((rig.camera_yaw() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn left_turn_has_negative_yaw() {
        let mut rig = PlayspaceRig::standing(Vec3::ZERO, 1.6);
        let pivot = rig.camera_position();
        rig.rotate_around(pivot, Vec3::Y, -90.0);
        assert!((rig.camera_yaw() + 90.0).abs() < 1e-3);
    }
}
