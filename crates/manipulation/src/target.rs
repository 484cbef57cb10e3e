use glam::{Quat, Vec3};
use mrkit_common::Transform;

/// The object being manipulated, as the handler sees it.
///
/// The host owns the scene object and the pointer; the handler only reads
/// and writes through this seam.
pub trait ManipulationTarget {
    fn set_position(&mut self, position: Vec3);
    /// Turn about world up. Positive degrees turn right.
    fn rotate_yaw(&mut self, degrees: f32);
    fn uniform_scale(&self) -> f32;
    fn set_uniform_scale(&mut self, scale: f32);
    /// How far along the pointer ray the held object sits.
    fn pointer_extent(&self) -> f32;
    /// Distance to whatever the pointer ray currently hits.
    fn ray_distance(&self) -> f32;
    fn set_pointer_extent(&mut self, extent: f32);
    /// Colliders are disabled while held so the pointer ray passes through.
    fn set_colliders_active(&mut self, _active: bool) {}
}

/// A plain held object: a transform plus the pointer state that carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeldObject {
    pub transform: Transform,
    pub pointer_extent: f32,
    pub ray_distance: f32,
    pub colliders_active: bool,
}

impl Default for HeldObject {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            pointer_extent: 2.0,
            ray_distance: 10.0,
            colliders_active: true,
        }
    }
}

impl HeldObject {
    /// Yaw in degrees, positive to the right.
    pub fn yaw(&self) -> f32 {
        let f = self.transform.forward();
        f.x.atan2(-f.z).to_degrees()
    }
}

impl ManipulationTarget for HeldObject {
    fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    fn rotate_yaw(&mut self, degrees: f32) {
        let q = Quat::from_rotation_y(-degrees.to_radians());
        self.transform.rotation = (q * self.transform.rotation).normalize();
    }

    fn uniform_scale(&self) -> f32 {
        self.transform.scale.x
    }

    fn set_uniform_scale(&mut self, scale: f32) {
        self.transform.scale = Vec3::splat(scale);
    }

    fn pointer_extent(&self) -> f32 {
        self.pointer_extent
    }

    fn ray_distance(&self) -> f32 {
        self.ray_distance
    }

    fn set_pointer_extent(&mut self, extent: f32) {
        self.pointer_extent = extent;
    }

    fn set_colliders_active(&mut self, active: bool) {
        self.colliders_active = active;
    }
}
