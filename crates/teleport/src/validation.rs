//! Teleport target classification and the line colour it selects.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::hotspot::HotSpot;
use crate::line::RaycastResult;

/// How the last raycast classified the teleport target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TeleportValidationResult {
    /// Nothing hit, or the hit is not a teleport surface.
    #[default]
    None,
    Valid,
    Invalid,
    HotSpot,
}

impl TeleportValidationResult {
    /// Decode a raw classification code. Unknown codes are not teleport targets.
    pub fn from_raw(code: u8) -> Self {
        match code {
            1 => Self::Valid,
            2 => Self::Invalid,
            3 => Self::HotSpot,
            _ => Self::None,
        }
    }

    /// Whether releasing on this result commits the teleport.
    pub fn is_teleportable(self) -> bool {
        matches!(self, Self::Valid | Self::HotSpot)
    }
}

/// The four line colour categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineGradient {
    NoTarget,
    Valid,
    Invalid,
    HotSpot,
}

/// Line colour for a validation result.
pub fn line_gradient(result: TeleportValidationResult) -> LineGradient {
    match result {
        TeleportValidationResult::None => LineGradient::NoTarget,
        TeleportValidationResult::Valid => LineGradient::Valid,
        TeleportValidationResult::Invalid => LineGradient::Invalid,
        TeleportValidationResult::HotSpot => LineGradient::HotSpot,
    }
}

/// Classifies a raycast hit as a teleport target.
pub trait ValidationProvider {
    fn classify(&self, hit: &RaycastResult, hot_spot: Option<&HotSpot>) -> TeleportValidationResult;
}

impl<F> ValidationProvider for F
where
    F: Fn(&RaycastResult, Option<&HotSpot>) -> TeleportValidationResult,
{
    fn classify(&self, hit: &RaycastResult, hot_spot: Option<&HotSpot>) -> TeleportValidationResult {
        self(hit, hot_spot)
    }
}

/// Rules for `SurfaceValidationProvider`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceValidationConfig {
    /// Bit mask of layers the player may stand on.
    pub valid_layers: u32,
    /// Bit mask of layers that block teleporting. Checked before `valid_layers`.
    pub invalid_layers: u32,
    /// Maximum angle in degrees between the surface normal and up.
    pub up_direction_threshold: f32,
    /// Maximum arc distance to the target.
    pub max_distance: f32,
    /// Maximum height difference between pointer origin and target.
    pub max_height_change: f32,
}

impl Default for SurfaceValidationConfig {
    fn default() -> Self {
        Self {
            valid_layers: 1,
            invalid_layers: 1 << 2,
            up_direction_threshold: 30.0,
            max_distance: 20.0,
            max_height_change: 10.0,
        }
    }
}

/// Validates by hot-spot, physics layer, surface slope, distance and height.
#[derive(Debug, Clone, Default)]
pub struct SurfaceValidationProvider {
    config: SurfaceValidationConfig,
}

impl SurfaceValidationProvider {
    pub fn new(config: SurfaceValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SurfaceValidationConfig {
        &self.config
    }
}

impl ValidationProvider for SurfaceValidationProvider {
    fn classify(&self, hit: &RaycastResult, hot_spot: Option<&HotSpot>) -> TeleportValidationResult {
        if !hit.is_hit() {
            return TeleportValidationResult::None;
        }
        if hot_spot.is_some_and(|hs| hs.is_valid) {
            return TeleportValidationResult::HotSpot;
        }

        let Some(bit) = 1u32.checked_shl(hit.layer) else {
            return TeleportValidationResult::None;
        };
        if self.config.invalid_layers & bit != 0 {
            return TeleportValidationResult::Invalid;
        }
        if self.config.valid_layers & bit == 0 {
            return TeleportValidationResult::None;
        }

        let slope = hit.normal.normalize_or_zero().angle_between(Vec3::Y).to_degrees();
        let height_change = (hit.point.y - hit.origin.y).abs();
        if slope <= self.config.up_direction_threshold
            && hit.distance <= self.config.max_distance
            && height_change <= self.config.max_height_change
        {
            TeleportValidationResult::Valid
        } else {
            TeleportValidationResult::Invalid
        }
    }
}
