//! Teleport arc geometry: the ray steps handed to the raycaster and the
//! hit it reports back.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::hotspot::HotSpot;

/// Id of the scene object a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// One straight segment of the teleport arc.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RayStep {
    pub origin: Vec3,
    pub terminus: Vec3,
}

impl RayStep {
    pub fn new(origin: Vec3, terminus: Vec3) -> Self {
        Self { origin, terminus }
    }

    pub fn length(&self) -> f32 {
        self.origin.distance(self.terminus)
    }

    pub fn direction(&self) -> Vec3 {
        (self.terminus - self.origin).normalize_or_zero()
    }
}

/// A ballistic arc from the pointer: `p(t) = origin + velocity * t + gravity * t² / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParabolicArc {
    pub origin: Vec3,
    pub velocity: Vec3,
    pub gravity: Vec3,
    /// Flight time covered by the whole line.
    pub duration: f32,
}

impl ParabolicArc {
    pub fn new(origin: Vec3, direction: Vec3, speed: f32, duration: f32) -> Self {
        Self {
            origin,
            velocity: direction.normalize_or_zero() * speed,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            duration,
        }
    }

    /// Point on the arc at normalized length `u` in `0..=1`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        let t = u * self.duration;
        self.origin + self.velocity * t + self.gravity * (0.5 * t * t)
    }

    /// Cut the arc into `resolution` consecutive ray steps.
    pub fn ray_steps(&self, resolution: usize) -> Vec<RayStep> {
        let resolution = resolution.max(1);
        let step = 1.0 / resolution as f32;
        let mut last = self.point_at(0.0);
        (0..resolution)
            .map(|i| {
                let current = self.point_at(step * (i + 1) as f32);
                let ray = RayStep::new(last, current);
                last = current;
                ray
            })
            .collect()
    }
}

/// What the raycaster found along the ray steps, once per render tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaycastResult {
    /// The object hit, if any. `None` means the whole arc is clear.
    pub target: Option<TargetId>,
    /// The hot-spot the hit object belongs to, if any.
    pub hot_spot: Option<HotSpot>,
    /// Physics layer of the hit object.
    pub layer: u32,
    /// Where the pointer ray started.
    pub origin: Vec3,
    /// Start of the ray step that produced the hit.
    pub start_point: Vec3,
    /// The hit point.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// Index of the ray step that produced the hit.
    pub step_index: usize,
    /// Distance travelled along the arc up to the hit.
    pub distance: f32,
}

impl RaycastResult {
    /// A result for an arc that hit nothing.
    pub fn miss(origin: Vec3) -> Self {
        Self {
            target: None,
            hot_spot: None,
            layer: 0,
            origin,
            start_point: origin,
            point: origin,
            normal: Vec3::Y,
            step_index: 0,
            distance: 0.0,
        }
    }

    /// A hit on `target` at `point` produced by ray step `step_index`.
    pub fn hit(target: TargetId, steps: &[RayStep], step_index: usize, point: Vec3) -> Self {
        let origin = steps.first().map_or(point, |s| s.origin);
        let start_point = steps.get(step_index).map_or(origin, |s| s.origin);
        let mut result = Self {
            target: Some(target),
            origin,
            start_point,
            point,
            step_index,
            ..Self::miss(origin)
        };
        result.distance = clear_world_length(steps, &result);
        result
    }

    pub fn with_hot_spot(mut self, hot_spot: HotSpot) -> Self {
        self.hot_spot = Some(hot_spot);
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    pub fn is_hit(&self) -> bool {
        self.target.is_some()
    }
}

/// Length of arc that is clear of obstacles: every full step before the
/// hit step, plus the part of the hit step up to the hit point.
pub fn clear_world_length(steps: &[RayStep], hit: &RaycastResult) -> f32 {
    let full: f32 = steps
        .iter()
        .take(hit.step_index.min(steps.len()))
        .map(RayStep::length)
        .sum();
    full + hit.start_point.distance(hit.point)
}

/// Clear length as a fraction of the whole line, for clamping the line end.
pub fn normalized_length(steps: &[RayStep], world_length: f32) -> f32 {
    let total: f32 = steps.iter().map(RayStep::length).sum();
    if total <= f32::EPSILON {
        return 1.0;
    }
    (world_length / total).clamp(0.0, 1.0)
}
